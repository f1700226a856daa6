//! # Portfolio
//!
//! $$
//! \mu_p=\mathbf w\cdot\bar{\mathbf r}\cdot 252,\qquad
//! \sigma_p=\sqrt{\mathbf w^\top(\Sigma\cdot 252)\mathbf w}
//! $$
//!
//! Named collection of price series with a weight map, portfolio-level
//! risk metrics and portfolio-level Monte Carlo projection.

pub mod data;
pub mod metrics;
pub mod weights;

use std::collections::BTreeMap;

use ndarray::Array1;
use ndarray::Array2;

use crate::error::QuantError;
use crate::error::Result;
use crate::market::series::PriceSeries;
use crate::simulation::montecarlo::MonteCarloEngine;
use crate::simulation::montecarlo::SimulationMethod;
use crate::simulation::montecarlo::SimulationResult;
use crate::TRADING_DAYS_PER_YEAR;

pub use data::align_returns;
pub use data::AlignedReturns;
pub use metrics::GlobalMetrics;
pub use weights::equal_weights;
pub use weights::inverse_volatility_weights;

/// Default tail probability for VaR/CVaR.
pub const DEFAULT_VAR_ALPHA: f64 = 0.05;

/// A named basket of [`PriceSeries`] with a weight map.
///
/// The portfolio owns its members exclusively; no mutable state is shared
/// with callers. Duplicate tickers are not deduplicated and double-count in
/// aggregation; avoiding duplicates is the caller's contract.
#[derive(Clone, Debug)]
pub struct Portfolio {
  pub name: String,
  series: Vec<PriceSeries>,
  /// Raw weights as supplied or recomputed; normalized on read.
  raw_weights: BTreeMap<String, f64>,
  /// Annual risk-free rate used by the portfolio Sharpe ratio.
  pub risk_free_rate: f64,
}

impl Portfolio {
  /// New empty portfolio with the default 2% annual risk-free rate.
  pub fn new(name: impl Into<String>) -> Self {
    Self::with_risk_free_rate(name, 0.02)
  }

  pub fn with_risk_free_rate(name: impl Into<String>, risk_free_rate: f64) -> Self {
    Self {
      name: name.into(),
      series: Vec::new(),
      raw_weights: BTreeMap::new(),
      risk_free_rate,
    }
  }

  pub fn len(&self) -> usize {
    self.series.len()
  }

  pub fn is_empty(&self) -> bool {
    self.series.is_empty()
  }

  /// Member series in insertion order.
  pub fn series(&self) -> &[PriceSeries] {
    &self.series
  }

  /// Normalized weight map; always sums to one while members exist.
  pub fn weights(&self) -> BTreeMap<String, f64> {
    weights::normalized(&self.raw_weights)
  }

  /// Append a series. An explicit weight is stored as given (the map is
  /// normalized on read); without one, the whole weight map is recomputed
  /// with the inverse-volatility scheme and its equal-weight fallback.
  pub fn add_series(&mut self, series: PriceSeries, weight: Option<f64>) {
    match weight {
      Some(w) => {
        self.raw_weights.insert(series.ticker.clone(), w);
        self.series.push(series);
      }
      None => {
        self.series.push(series);
        self.raw_weights = weights::inverse_volatility_weights(&self.series);
      }
    }
  }

  /// Date-intersected return matrix over all members. Empty portfolio
  /// yields an empty result; members without common dates raise
  /// [`QuantError::NoOverlap`].
  pub fn aligned_returns(&self) -> Result<AlignedReturns> {
    data::align_returns(&self.series)
  }

  /// Pearson correlation matrix between members, in aligned-ticker order.
  pub fn correlation_matrix(&self) -> Result<Array2<f64>> {
    Ok(self.aligned_returns()?.correlation())
  }

  /// Mean pairwise correlation between members, the diagonal excluded.
  /// NaN with fewer than two assets or no aligned data.
  pub fn diversification_score(&self) -> f64 {
    let aligned = match self.aligned_returns() {
      Ok(a) => a,
      Err(_) => return f64::NAN,
    };

    if aligned.n_assets() < 2 || aligned.n_dates() == 0 {
      return f64::NAN;
    }

    metrics::mean_pairwise_correlation(&aligned.correlation())
  }

  /// Portfolio metrics at the default 5% tail.
  pub fn global_metrics(&self) -> Result<GlobalMetrics> {
    self.global_metrics_with_alpha(DEFAULT_VAR_ALPHA)
  }

  /// Annualized return/volatility, Sharpe, and historical VaR/CVaR over
  /// the aligned return matrix. All values are undefined together when no
  /// aligned data exists; the no-overlap condition propagates as an error
  /// for the report layer to phrase.
  pub fn global_metrics_with_alpha(&self, alpha: f64) -> Result<GlobalMetrics> {
    let aligned = self.aligned_returns()?;

    if aligned.is_empty() {
      return Ok(GlobalMetrics::undefined(alpha));
    }

    let w = self.weight_vector(&aligned.tickers);
    let mean_returns = aligned.mean_returns();
    let cov = aligned.covariance();

    let annualized_return = w.dot(&mean_returns) * TRADING_DAYS_PER_YEAR;
    let annualized_volatility = w.dot(&(cov * TRADING_DAYS_PER_YEAR).dot(&w)).sqrt();
    let sharpe = if annualized_volatility > 0.0 {
      (annualized_return - self.risk_free_rate) / annualized_volatility
    } else {
      f64::NAN
    };

    let portfolio_returns = aligned.portfolio_returns(&w).to_vec();
    let var = metrics::historical_var(&portfolio_returns, alpha);
    let cvar = metrics::historical_cvar(&portfolio_returns, alpha);

    Ok(GlobalMetrics {
      annualized_return,
      annualized_volatility,
      sharpe,
      var,
      cvar,
      alpha,
      weights: aligned
        .tickers
        .iter()
        .cloned()
        .zip(w.iter().copied())
        .collect(),
    })
  }

  /// Project the aggregate portfolio price under GBM with scalar
  /// portfolio drift/volatility (weighted mean return and weighted
  /// covariance), stepping one day per row. The initial price is the
  /// weighted sum of each member's latest close.
  pub fn simulate_monte_carlo(
    &self,
    num_days: usize,
    num_simulations: usize,
    seed: Option<u64>,
  ) -> Result<SimulationResult> {
    if self.series.is_empty() {
      return Err(QuantError::EmptyInput(format!("portfolio {}", self.name)));
    }

    let aligned = self.aligned_returns()?;
    let w = self.weight_vector(&aligned.tickers);

    let mu = w.dot(&aligned.mean_returns());
    let variance = w.dot(&aligned.covariance().dot(&w));
    let sigma = variance.sqrt();

    let initial_price: f64 = aligned
      .tickers
      .iter()
      .zip(w.iter())
      .map(|(ticker, &wi)| {
        let close = self
          .series
          .iter()
          .find(|s| &s.ticker == ticker)
          .and_then(|s| s.latest_close())
          .unwrap_or(f64::NAN);
        wi * close
      })
      .sum();

    // Daily drift/vol with unit step: the per-step convention the engine
    // documents.
    let engine = MonteCarloEngine::new(1.0, seed, SimulationMethod::Gbm);
    engine.simulate(initial_price, mu, sigma, num_days, num_simulations)
  }

  /// Normalized weight vector in `tickers` order; missing tickers default
  /// to `1/n` before normalization.
  fn weight_vector(&self, tickers: &[String]) -> Array1<f64> {
    let n = tickers.len();
    let mut w = Array1::from_iter(
      tickers
        .iter()
        .map(|t| self.raw_weights.get(t).copied().unwrap_or(1.0 / n as f64)),
    );

    let sum = w.sum();
    if sum.is_finite() && sum > 0.0 {
      w /= sum;
    } else {
      w.fill(1.0 / n as f64);
    }

    w
  }
}
