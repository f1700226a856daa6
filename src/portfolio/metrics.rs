//! # Portfolio Risk Metrics
//!
//! $$
//! \sigma_p=\sqrt{\mathbf w^\top(\Sigma\cdot 252)\mathbf w},\qquad
//! \text{CVaR}_\alpha=\mathbb E[r_p \mid r_p \le \text{VaR}_\alpha]
//! $$
//!
//! Aggregate return/risk figures over the aligned return matrix. Every
//! field uses NaN as the undefined sentinel so an uncomputable portfolio
//! degrades into an explicit "cannot compute" report instead of a panic.

use ndarray::Array2;

use crate::stats;

/// Portfolio-level metrics record. VaR/CVaR are expressed in percent of
/// portfolio value (negative in the loss tail).
#[derive(Clone, Debug)]
pub struct GlobalMetrics {
  pub annualized_return: f64,
  pub annualized_volatility: f64,
  pub sharpe: f64,
  /// Historical Value-at-Risk at `alpha`, in percent.
  pub var: f64,
  /// Expected shortfall at `alpha`, in percent.
  pub cvar: f64,
  /// Tail probability the VaR/CVaR figures refer to.
  pub alpha: f64,
  /// Normalized weights in aligned-ticker order.
  pub weights: Vec<(String, f64)>,
}

impl GlobalMetrics {
  /// All-NaN record for a portfolio with no aligned data.
  pub fn undefined(alpha: f64) -> Self {
    Self {
      annualized_return: f64::NAN,
      annualized_volatility: f64::NAN,
      sharpe: f64::NAN,
      var: f64::NAN,
      cvar: f64::NAN,
      alpha,
      weights: Vec::new(),
    }
  }

  /// True when no metric could be computed.
  pub fn is_undefined(&self) -> bool {
    self.weights.is_empty() && self.annualized_return.is_nan()
  }

  /// Flatten the numeric metrics into key/value pairs for exporters.
  pub fn to_pairs(&self) -> Vec<(&'static str, f64)> {
    vec![
      ("annualized_return", self.annualized_return),
      ("annualized_volatility", self.annualized_volatility),
      ("sharpe", self.sharpe),
      ("var", self.var),
      ("cvar", self.cvar),
    ]
  }
}

/// Historical VaR: the `alpha`-quantile of per-date portfolio returns,
/// in percent.
pub fn historical_var(portfolio_returns: &[f64], alpha: f64) -> f64 {
  stats::quantile(portfolio_returns, alpha) * 100.0
}

/// Historical CVaR: mean of portfolio returns at or below the `alpha`
/// quantile, in percent. At least as extreme as VaR by construction.
pub fn historical_cvar(portfolio_returns: &[f64], alpha: f64) -> f64 {
  let cutoff = stats::quantile(portfolio_returns, alpha);
  if cutoff.is_nan() {
    return f64::NAN;
  }

  let tail: Vec<f64> = portfolio_returns
    .iter()
    .copied()
    .filter(|r| r.is_finite() && *r <= cutoff)
    .collect();

  stats::sample_mean(&tail) * 100.0
}

/// Mean pairwise correlation with the diagonal excluded. NaN for fewer
/// than two assets.
pub fn mean_pairwise_correlation(corr: &Array2<f64>) -> f64 {
  let n = corr.nrows();
  if n < 2 {
    return f64::NAN;
  }

  let mut acc = 0.0;
  let mut count = 0usize;

  for i in 0..n {
    for j in 0..n {
      if i != j {
        acc += corr[[i, j]];
        count += 1;
      }
    }
  }

  acc / count as f64
}
