//! # Aligned Return Data
//!
//! $$
//! R\in\mathbb{R}^{T\times N},\qquad \Sigma_{ij}=\operatorname{cov}(R_{\cdot i},R_{\cdot j})
//! $$
//!
//! Cross-asset return table restricted to dates present in every member
//! series, and the covariance/correlation machinery built on top of it.
//! Only finite returns participate: a date where any member's return is
//! missing drops out of the intersection entirely.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use ndarray::Array1;
use ndarray::Array2;
use tracing::debug;

use crate::error::QuantError;
use crate::error::Result;
use crate::market::series::PriceSeries;
use crate::stats;

/// Date-intersected return matrix: rows are dates, columns are assets in
/// `tickers` order.
#[derive(Clone, Debug)]
pub struct AlignedReturns {
  pub dates: Vec<NaiveDate>,
  pub tickers: Vec<String>,
  pub matrix: Array2<f64>,
}

impl AlignedReturns {
  pub fn empty() -> Self {
    Self {
      dates: Vec::new(),
      tickers: Vec::new(),
      matrix: Array2::zeros((0, 0)),
    }
  }

  pub fn is_empty(&self) -> bool {
    self.dates.is_empty() || self.tickers.is_empty()
  }

  pub fn n_dates(&self) -> usize {
    self.dates.len()
  }

  pub fn n_assets(&self) -> usize {
    self.tickers.len()
  }

  /// Mean daily return per asset.
  pub fn mean_returns(&self) -> Array1<f64> {
    Array1::from_iter(
      self
        .matrix
        .columns()
        .into_iter()
        .map(|col| stats::sample_mean(&col.to_vec())),
    )
  }

  /// Sample covariance matrix of daily returns. NaN-filled when fewer than
  /// two aligned dates exist.
  pub fn covariance(&self) -> Array2<f64> {
    let n = self.n_assets();
    let t = self.n_dates();

    if t < 2 {
      return Array2::from_elem((n, n), f64::NAN);
    }

    let means = self.mean_returns();
    let mut cov = Array2::zeros((n, n));

    for i in 0..n {
      for j in i..n {
        let mut acc = 0.0;
        for k in 0..t {
          acc += (self.matrix[[k, i]] - means[i]) * (self.matrix[[k, j]] - means[j]);
        }
        let c = acc / (t - 1) as f64;
        cov[[i, j]] = c;
        cov[[j, i]] = c;
      }
    }

    cov
  }

  /// Pearson correlation matrix of daily returns.
  pub fn correlation(&self) -> Array2<f64> {
    let n = self.n_assets();
    let mut corr = Array2::from_elem((n, n), 1.0);

    let cols: Vec<Vec<f64>> = self
      .matrix
      .columns()
      .into_iter()
      .map(|col| col.to_vec())
      .collect();

    for i in 0..n {
      for j in (i + 1)..n {
        let r = pearson(&cols[i], &cols[j]);
        corr[[i, j]] = r;
        corr[[j, i]] = r;
      }
    }

    corr
  }

  /// Per-date portfolio return `R w`.
  pub fn portfolio_returns(&self, weights: &Array1<f64>) -> Array1<f64> {
    self.matrix.dot(weights)
  }
}

/// Build the date-intersected return matrix for a set of series.
///
/// No members yields an empty result; members whose return dates share no
/// intersection raise [`QuantError::NoOverlap`]. A series too short to have
/// any finite return contributes no dates and therefore forces the
/// no-overlap condition.
pub fn align_returns(series: &[PriceSeries]) -> Result<AlignedReturns> {
  if series.is_empty() {
    return Ok(AlignedReturns::empty());
  }

  let per_series: Vec<BTreeMap<NaiveDate, f64>> = series
    .iter()
    .map(|s| s.return_dates().into_iter().collect())
    .collect();

  let mut dates: Vec<NaiveDate> = per_series[0].keys().copied().collect();
  for map in &per_series[1..] {
    dates.retain(|d| map.contains_key(d));
  }

  if dates.is_empty() {
    return Err(QuantError::NoOverlap);
  }

  let matrix = Array2::from_shape_fn((dates.len(), series.len()), |(k, i)| {
    per_series[i][&dates[k]]
  });

  debug!(
    assets = series.len(),
    rows = dates.len(),
    "aligned return matrix built"
  );

  Ok(AlignedReturns {
    dates,
    tickers: series.iter().map(|s| s.ticker.clone()).collect(),
    matrix,
  })
}

fn pearson(x: &[f64], y: &[f64]) -> f64 {
  let n = x.len().min(y.len());
  if n < 2 {
    return 0.0;
  }

  let mx = stats::sample_mean(x);
  let my = stats::sample_mean(y);

  let mut cov = 0.0;
  let mut sx = 0.0;
  let mut sy = 0.0;

  for i in 0..n {
    let dx = x[i] - mx;
    let dy = y[i] - my;
    cov += dx * dy;
    sx += dx * dx;
    sy += dy * dy;
  }

  let denom = (sx * sy).sqrt();
  if denom < 1e-15 {
    0.0
  } else {
    (cov / denom).clamp(-1.0, 1.0)
  }
}
