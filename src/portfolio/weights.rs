//! # Weighting Schemes
//!
//! $$
//! w_i=\frac{1/\sigma_i}{\sum_j 1/\sigma_j}
//! $$
//!
//! Default allocation is inverse volatility; any member with zero or
//! undefined volatility makes the scheme meaningless, so the whole map
//! falls back to equal weights.

use std::collections::BTreeMap;

use tracing::warn;

use crate::market::series::PriceSeries;

/// Inverse-volatility weights over all members, with equal-weight fallback
/// when any volatility is zero or NaN.
pub fn inverse_volatility_weights(series: &[PriceSeries]) -> BTreeMap<String, f64> {
  if series.is_empty() {
    return BTreeMap::new();
  }

  let vols: Vec<f64> = series.iter().map(|s| s.annualized_volatility).collect();

  if vols.iter().any(|v| !v.is_finite() || *v == 0.0) {
    warn!("zero or undefined volatility among members, falling back to equal weights");
    return equal_weights(series);
  }

  let total: f64 = vols.iter().map(|v| 1.0 / v).sum();
  series
    .iter()
    .zip(vols.iter())
    .map(|(s, v)| (s.ticker.clone(), (1.0 / v) / total))
    .collect()
}

/// `1/n` for every member.
pub fn equal_weights(series: &[PriceSeries]) -> BTreeMap<String, f64> {
  let n = series.len();
  series
    .iter()
    .map(|s| (s.ticker.clone(), 1.0 / n as f64))
    .collect()
}

/// Scale a weight map so it sums to one; degenerate sums become equal
/// weights.
pub fn normalized(weights: &BTreeMap<String, f64>) -> BTreeMap<String, f64> {
  let sum: f64 = weights.values().sum();

  if weights.is_empty() {
    return BTreeMap::new();
  }

  if !sum.is_finite() || sum <= 0.0 {
    let n = weights.len();
    return weights.keys().map(|t| (t.clone(), 1.0 / n as f64)).collect();
  }

  weights.iter().map(|(t, w)| (t.clone(), w / sum)).collect()
}
