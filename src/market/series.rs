//! # Price Series
//!
//! $$
//! \sigma_{ann}=s(r)\sqrt{252},\qquad
//! \text{Sharpe}=\frac{\bar r-r_f/252}{s(r)}\sqrt{252}
//! $$
//!
//! One asset's ordered price history and its eagerly derived statistics.
//! A series is built once from a snapshot of records and never recomputed:
//! new data means a new instance. Statistics that cannot be computed are
//! NaN, and downstream aggregation excludes them instead of zeroing them.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use ndarray::Array1;

use crate::error::QuantError;
use crate::error::Result;
use crate::market::record::PriceRecord;
use crate::simulation::montecarlo::MonteCarloEngine;
use crate::simulation::montecarlo::SimulationMethod;
use crate::simulation::montecarlo::SimulationResult;
use crate::stats;
use crate::DEFAULT_DT;
use crate::TRADING_DAYS_PER_YEAR;

/// Historical price series for a single ticker with derived return and
/// risk statistics.
#[derive(Clone, Debug)]
pub struct PriceSeries {
  pub ticker: String,
  records: Vec<PriceRecord>,
  /// Mean of the close column.
  pub mean_close: f64,
  /// Sample standard deviation of the close column.
  pub std_close: f64,
  /// Daily log returns, length n − 1. NaN marks an uncomputable step
  /// (non-positive close on either side).
  pub log_returns: Array1<f64>,
  /// `std(log_returns) * sqrt(252)`.
  pub annualized_volatility: f64,
  /// Compounded return per step; NaN returns compound as zero.
  pub cumulative_return: Array1<f64>,
  /// Annualized Sharpe ratio against `risk_free_rate`. NaN when the
  /// return dispersion is zero or undefined.
  pub sharpe_ratio: f64,
  /// Annual risk-free rate used in the Sharpe computation.
  pub risk_free_rate: f64,
}

impl PriceSeries {
  /// Build a series from a snapshot of records, sorting ascending by date
  /// and computing all derived statistics. Risk-free rate defaults to zero.
  pub fn new(ticker: impl Into<String>, records: Vec<PriceRecord>) -> Self {
    Self::with_risk_free_rate(ticker, records, 0.0)
  }

  /// Like [`PriceSeries::new`] with an explicit annual risk-free rate.
  pub fn with_risk_free_rate(
    ticker: impl Into<String>,
    mut records: Vec<PriceRecord>,
    risk_free_rate: f64,
  ) -> Self {
    records.sort_by_key(|r| r.date);

    let closes: Vec<f64> = records.iter().map(|r| r.close).collect();
    let log_returns = log_returns(&closes);
    let returns = log_returns.as_slice().unwrap_or(&[]);

    let daily_std = stats::sample_std(returns);
    let annualized_volatility = daily_std * TRADING_DAYS_PER_YEAR.sqrt();
    let cumulative_return = compound_returns(returns);
    let sharpe_ratio = sharpe(returns, risk_free_rate);

    Self {
      ticker: ticker.into(),
      mean_close: stats::sample_mean(&closes),
      std_close: stats::sample_std(&closes),
      log_returns,
      annualized_volatility,
      cumulative_return,
      sharpe_ratio,
      risk_free_rate,
      records,
    }
  }

  /// Number of price records.
  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }

  /// Records in ascending date order.
  pub fn records(&self) -> &[PriceRecord] {
    &self.records
  }

  /// Most recent close, if any records exist.
  pub fn latest_close(&self) -> Option<f64> {
    self.records.last().map(|r| r.close)
  }

  /// Dates carrying a return observation: the date of each record after the
  /// first whose step return is finite.
  pub fn return_dates(&self) -> Vec<(NaiveDate, f64)> {
    self
      .records
      .iter()
      .skip(1)
      .zip(self.log_returns.iter())
      .filter(|(_, r)| r.is_finite())
      .map(|(rec, &r)| (rec.date, r))
      .collect()
  }

  /// Mean daily log return. NaN when no finite returns exist.
  pub fn daily_drift(&self) -> f64 {
    stats::sample_mean(self.log_returns.as_slice().unwrap_or(&[]))
  }

  /// Sample standard deviation of daily log returns.
  pub fn daily_volatility(&self) -> f64 {
    stats::sample_std(self.log_returns.as_slice().unwrap_or(&[]))
  }

  /// Total compounded return over the whole series. NaN for series with
  /// fewer than two records.
  pub fn total_return(&self) -> f64 {
    self
      .cumulative_return
      .last()
      .copied()
      .unwrap_or(f64::NAN)
  }

  /// Read-only snapshot of the derived metrics.
  pub fn summary(&self) -> SeriesSummary {
    SeriesSummary {
      ticker: self.ticker.clone(),
      mean_close: self.mean_close,
      std_close: self.std_close,
      annualized_volatility: self.annualized_volatility,
      sharpe_ratio: self.sharpe_ratio,
      total_return: self.total_return(),
      observations: self.records.len(),
    }
  }

  /// Project forward price paths with historical daily drift/volatility
  /// under GBM. The result is returned, never cached on the series.
  pub fn simulate_monte_carlo(
    &self,
    num_days: usize,
    num_simulations: usize,
    seed: Option<u64>,
  ) -> Result<SimulationResult> {
    let initial_price = self
      .latest_close()
      .ok_or_else(|| QuantError::EmptyInput(format!("series {}", self.ticker)))?;

    let engine = MonteCarloEngine::new(DEFAULT_DT, seed, SimulationMethod::Gbm);
    engine.simulate(
      initial_price,
      self.daily_drift(),
      self.daily_volatility(),
      num_days,
      num_simulations,
    )
  }
}

/// Per-series metric record consumed by export/report collaborators.
/// NaN is the explicit "undefined" sentinel.
#[derive(Clone, Debug)]
pub struct SeriesSummary {
  pub ticker: String,
  pub mean_close: f64,
  pub std_close: f64,
  pub annualized_volatility: f64,
  pub sharpe_ratio: f64,
  pub total_return: f64,
  pub observations: usize,
}

impl SeriesSummary {
  /// Flatten the numeric metrics into a key→value map.
  pub fn to_map(&self) -> BTreeMap<&'static str, f64> {
    BTreeMap::from([
      ("mean_close", self.mean_close),
      ("std_close", self.std_close),
      ("annualized_volatility", self.annualized_volatility),
      ("sharpe_ratio", self.sharpe_ratio),
      ("total_return", self.total_return),
      ("observations", self.observations as f64),
    ])
  }
}

/// Daily log returns from a close column; NaN where either close is
/// non-positive.
fn log_returns(closes: &[f64]) -> Array1<f64> {
  let n = closes.len().saturating_sub(1);
  let mut out = Array1::from_elem(n, f64::NAN);

  for i in 1..closes.len() {
    if closes[i - 1] > 0.0 && closes[i] > 0.0 {
      out[i - 1] = (closes[i] / closes[i - 1]).ln();
    }
  }

  out
}

/// Compounded return per step, `prod(1 + r_k) - 1`, treating NaN returns
/// as zero for compounding purposes only.
fn compound_returns(returns: &[f64]) -> Array1<f64> {
  let mut acc = 1.0;
  let mut out = Array1::zeros(returns.len());

  for (i, &r) in returns.iter().enumerate() {
    if r.is_finite() {
      acc *= 1.0 + r;
    }
    out[i] = acc - 1.0;
  }

  out
}

fn sharpe(returns: &[f64], risk_free_rate: f64) -> f64 {
  let mean = stats::sample_mean(returns);
  let std = stats::sample_std(returns);

  if std.is_nan() || std == 0.0 {
    return f64::NAN;
  }

  (mean - risk_free_rate / TRADING_DAYS_PER_YEAR) / std * TRADING_DAYS_PER_YEAR.sqrt()
}

#[cfg(test)]
mod tests {
  use approx::assert_relative_eq;
  use chrono::NaiveDate;

  use super::*;

  fn day(offset: u64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Days::new(offset)
  }

  fn series_from_closes(ticker: &str, closes: &[f64]) -> PriceSeries {
    let records = closes
      .iter()
      .enumerate()
      .map(|(i, &c)| PriceRecord::new(day(i as u64), c, c, c, c, 1_000.0, ticker.to_string()))
      .collect();
    PriceSeries::new(ticker, records)
  }

  #[test]
  fn log_returns_match_close_ratios() {
    let series = series_from_closes("AAA", &[100.0, 110.0, 99.0]);

    assert_eq!(series.log_returns.len(), 2);
    assert_relative_eq!(series.log_returns[0], (110.0f64 / 100.0).ln(), epsilon = 1e-12);
    assert_relative_eq!(series.log_returns[1], (99.0f64 / 110.0).ln(), epsilon = 1e-12);
  }

  #[test]
  fn cumulative_return_is_consistent_with_compounding() {
    let series = series_from_closes("AAA", &[100.0, 103.0, 101.0, 108.0, 104.0]);

    let mut acc = 1.0;
    for (i, &r) in series.log_returns.iter().enumerate() {
      acc *= 1.0 + r;
      assert_relative_eq!(1.0 + series.cumulative_return[i], acc, epsilon = 1e-12);
    }
  }

  #[test]
  fn volatility_scales_std_by_sqrt_252() {
    // Alternating ±1% log returns: zero mean, known constant dispersion.
    let r = 0.01f64;
    let mut closes = vec![100.0];
    for i in 0..8 {
      let step = if i % 2 == 0 { r } else { -r };
      closes.push(closes.last().unwrap() * step.exp());
    }

    let series = series_from_closes("AAA", &closes);
    let expected_std = (8.0 * r * r / 7.0).sqrt();
    assert_relative_eq!(
      series.annualized_volatility,
      expected_std * 252.0f64.sqrt(),
      epsilon = 1e-12
    );
  }

  #[test]
  fn unsorted_records_are_sorted_by_date() {
    let records = vec![
      PriceRecord::new(day(2), 0.0, 0.0, 0.0, 120.0, 0.0, "AAA".into()),
      PriceRecord::new(day(0), 0.0, 0.0, 0.0, 100.0, 0.0, "AAA".into()),
      PriceRecord::new(day(1), 0.0, 0.0, 0.0, 110.0, 0.0, "AAA".into()),
    ];

    let series = PriceSeries::new("AAA", records);
    let closes: Vec<f64> = series.records().iter().map(|r| r.close).collect();
    assert_eq!(closes, vec![100.0, 110.0, 120.0]);
  }

  #[test]
  fn empty_series_degrades_to_nan_without_panicking() {
    let series = PriceSeries::new("EMPTY", vec![]);

    assert!(series.is_empty());
    assert_eq!(series.log_returns.len(), 0);
    assert!(series.mean_close.is_nan());
    assert!(series.annualized_volatility.is_nan());
    assert!(series.sharpe_ratio.is_nan());
    assert!(series.total_return().is_nan());
  }

  #[test]
  fn constant_closes_leave_sharpe_undefined() {
    let series = series_from_closes("FLAT", &[50.0, 50.0, 50.0, 50.0]);

    assert_relative_eq!(series.annualized_volatility, 0.0);
    assert!(series.sharpe_ratio.is_nan());
  }

  #[test]
  fn non_positive_close_yields_missing_return() {
    let series = series_from_closes("BAD", &[100.0, 0.0, 100.0, 110.0]);

    assert!(series.log_returns[0].is_nan());
    assert!(series.log_returns[1].is_nan());
    assert!(series.log_returns[2].is_finite());
    // Missing steps compound as zero.
    assert_relative_eq!(
      series.cumulative_return[1],
      0.0,
      epsilon = 1e-12
    );
  }

  #[test]
  fn summary_map_carries_nan_sentinel() {
    let series = PriceSeries::new("EMPTY", vec![]);
    let map = series.summary().to_map();

    assert!(map["sharpe_ratio"].is_nan());
    assert_eq!(map["observations"], 0.0);
  }

  #[test]
  fn empty_series_refuses_to_simulate() {
    let series = PriceSeries::new("EMPTY", vec![]);
    let err = series.simulate_monte_carlo(10, 5, Some(1)).unwrap_err();
    assert!(matches!(err, QuantError::EmptyInput(_)));
  }

  #[test]
  fn historical_simulation_has_requested_shape() {
    let series = series_from_closes("AAA", &[100.0, 101.0, 99.5, 102.0, 103.0]);
    let result = series.simulate_monte_carlo(20, 7, Some(42)).unwrap();

    assert_eq!(result.num_days(), 20);
    assert_eq!(result.num_simulations(), 7);
    assert_relative_eq!(result.paths[[0, 3]], 103.0);
  }
}
