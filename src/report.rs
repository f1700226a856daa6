//! # Reports
//!
//! Markdown-style renderings of computed metrics. Formatters are pure
//! functions of their snapshot: no recomputation side effects, no I/O.
//! Undefined metrics print an explicit `n/a` placeholder, never a
//! formatted NaN, so report generation cannot crash on legitimately
//! missing statistics.

use ndarray_stats::QuantileExt;

use crate::error::QuantError;
use crate::market::series::PriceSeries;
use crate::portfolio::Portfolio;
use crate::simulation::montecarlo::SimulationResult;
use crate::stats;

/// Render a fixed-precision value, or `n/a` when undefined.
fn fmt_value(v: f64, digits: usize) -> String {
  if v.is_finite() {
    format!("{v:.digits$}")
  } else {
    "n/a".to_string()
  }
}

/// Render a ratio as a percentage, or `n/a` when undefined.
fn fmt_percent(v: f64) -> String {
  if v.is_finite() {
    format!("{:.2}%", v * 100.0)
  } else {
    "n/a".to_string()
  }
}

/// Render a value already expressed in percent points.
fn fmt_percent_points(v: f64) -> String {
  if v.is_finite() {
    format!("{v:.2}%")
  } else {
    "n/a".to_string()
  }
}

/// Per-asset report over the derived series statistics.
pub fn series_report(series: &PriceSeries) -> String {
  if series.is_empty() {
    return format!("No data available for {}\n", series.ticker);
  }

  let summary = series.summary();

  [
    format!("### Report for {}", summary.ticker),
    format!("- Mean close: {}", fmt_value(summary.mean_close, 2)),
    format!("- Std close: {}", fmt_value(summary.std_close, 2)),
    format!(
      "- Annualized volatility: {}",
      fmt_percent(summary.annualized_volatility)
    ),
    format!("- Total return: {}", fmt_percent(summary.total_return)),
    format!("- Sharpe ratio: {}", fmt_value(summary.sharpe_ratio, 2)),
    format!("- Observations: {}", summary.observations),
    String::new(),
  ]
  .join("\n")
}

/// Executive portfolio report: global metrics, composition and
/// diversification. Alignment failures become explicit messages rather
/// than escaping as errors.
pub fn portfolio_report(portfolio: &Portfolio) -> String {
  if portfolio.is_empty() {
    return format!("Portfolio '{}' contains no assets.\n", portfolio.name);
  }

  let metrics = match portfolio.global_metrics() {
    Ok(metrics) => metrics,
    Err(QuantError::NoOverlap) => {
      return format!(
        "Cannot compute metrics for portfolio '{}': members share no overlapping dates.\n",
        portfolio.name
      );
    }
    Err(e) => {
      return format!(
        "Cannot compute metrics for portfolio '{}': {e}.\n",
        portfolio.name
      );
    }
  };

  let observations = portfolio
    .aligned_returns()
    .map(|a| a.n_dates())
    .unwrap_or(0);
  let confidence = (1.0 - metrics.alpha) * 100.0;

  let mut lines = vec![
    format!("## Portfolio Report: {}", portfolio.name),
    String::new(),
    "**Global metrics:**".to_string(),
    format!(
      "- Annualized return: {}",
      fmt_percent(metrics.annualized_return)
    ),
    format!(
      "- Annualized volatility: {}",
      fmt_percent(metrics.annualized_volatility)
    ),
    format!("- Sharpe ratio: {}", fmt_value(metrics.sharpe, 2)),
    format!(
      "- VaR ({confidence:.0}%): {}",
      fmt_percent_points(metrics.var)
    ),
    format!(
      "- CVaR ({confidence:.0}%): {}",
      fmt_percent_points(metrics.cvar)
    ),
    String::new(),
    "**Composition:**".to_string(),
  ];

  for (ticker, weight) in &metrics.weights {
    lines.push(format!("- {ticker}: {}", fmt_percent(*weight)));
  }

  lines.extend([
    String::new(),
    "**Diversification:**".to_string(),
    format!(
      "- Mean pairwise correlation: {}",
      fmt_value(portfolio.diversification_score(), 2)
    ),
    format!("- Number of assets: {}", portfolio.len()),
    String::new(),
    format!("Aggregated over {observations} aligned return observations."),
    String::new(),
  ]);

  lines.join("\n")
}

/// Summary of the terminal price distribution of a simulation run; the
/// textual counterpart of the excluded plotting layer.
pub fn simulation_report(result: &SimulationResult) -> String {
  let finals = result.final_prices().to_owned();
  let final_slice = finals.to_vec();

  let min = finals.min().map(|v| *v).unwrap_or(f64::NAN);
  let max = finals.max().map(|v| *v).unwrap_or(f64::NAN);

  [
    format!(
      "### Monte Carlo summary ({} paths x {} days, {:?})",
      result.num_simulations(),
      result.num_days(),
      result.method
    ),
    format!("- Initial price: {}", fmt_value(result.initial_price, 2)),
    format!(
      "- Expected final price: {}",
      fmt_value(result.expected_final_price(), 2)
    ),
    format!(
      "- Final price range: {} .. {}",
      fmt_value(min, 2),
      fmt_value(max, 2)
    ),
    format!(
      "- 5% / 95% final quantiles: {} / {}",
      fmt_value(stats::quantile(&final_slice, 0.05), 2),
      fmt_value(stats::quantile(&final_slice, 0.95), 2)
    ),
    String::new(),
  ]
  .join("\n")
}

#[cfg(test)]
mod tests {
  use chrono::NaiveDate;

  use super::*;
  use crate::market::record::PriceRecord;
  use crate::simulation::montecarlo::MonteCarloEngine;
  use crate::simulation::montecarlo::SimulationMethod;
  use crate::DEFAULT_DT;

  fn series_from_closes(ticker: &str, closes: &[f64]) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let records = closes
      .iter()
      .enumerate()
      .map(|(i, &c)| {
        PriceRecord::new(
          start + chrono::Days::new(i as u64),
          c,
          c,
          c,
          c,
          0.0,
          ticker.to_string(),
        )
      })
      .collect();
    PriceSeries::new(ticker, records)
  }

  #[test]
  fn empty_series_report_is_an_explicit_message() {
    let series = PriceSeries::new("EMPTY", vec![]);
    let report = series_report(&series);

    assert!(report.contains("No data available for EMPTY"));
    assert!(!report.contains("NaN"));
  }

  #[test]
  fn undefined_metrics_render_as_placeholder() {
    // Two records: returns exist but dispersion does not.
    let series = series_from_closes("AAA", &[100.0, 100.0]);
    let report = series_report(&series);

    assert!(report.contains("Sharpe ratio: n/a"));
    assert!(!report.contains("NaN"));
  }

  #[test]
  fn series_report_includes_core_metrics() {
    let series = series_from_closes("AAA", &[100.0, 105.0, 103.0, 108.0]);
    let report = series_report(&series);

    assert!(report.contains("### Report for AAA"));
    assert!(report.contains("Observations: 4"));
    assert!(report.contains("Annualized volatility:"));
  }

  #[test]
  fn empty_portfolio_report_is_an_explicit_message() {
    let portfolio = Portfolio::new("void");
    let report = portfolio_report(&portfolio);

    assert!(report.contains("contains no assets"));
  }

  #[test]
  fn no_overlap_becomes_a_message_not_an_error() {
    let mut portfolio = Portfolio::new("disjoint");
    portfolio.add_series(series_from_closes("AAA", &[100.0, 101.0, 102.0]), None);

    let start = NaiveDate::from_ymd_opt(2030, 1, 1).unwrap();
    let far_records = vec![
      PriceRecord::new(start, 0.0, 0.0, 0.0, 50.0, 0.0, "BBB".into()),
      PriceRecord::new(
        start + chrono::Days::new(1),
        0.0,
        0.0,
        0.0,
        51.0,
        0.0,
        "BBB".into(),
      ),
    ];
    portfolio.add_series(PriceSeries::new("BBB", far_records), None);

    let report = portfolio_report(&portfolio);
    assert!(report.contains("no overlapping dates"));
  }

  #[test]
  fn portfolio_report_lists_composition() {
    let mut portfolio = Portfolio::new("pair");
    portfolio.add_series(series_from_closes("AAA", &[100.0, 101.0, 103.0]), Some(0.5));
    portfolio.add_series(series_from_closes("BBB", &[50.0, 49.5, 50.5]), Some(0.5));

    let report = portfolio_report(&portfolio);
    assert!(report.contains("## Portfolio Report: pair"));
    assert!(report.contains("- AAA: 50.00%"));
    assert!(report.contains("- BBB: 50.00%"));
    assert!(report.contains("aligned return observations"));
  }

  #[test]
  fn simulation_report_summarizes_final_prices() {
    let engine = MonteCarloEngine::new(DEFAULT_DT, Some(42), SimulationMethod::Gbm);
    let result = engine.simulate(100.0, 0.0, 0.0, 10, 5).unwrap();
    let report = simulation_report(&result);

    assert!(report.contains("5 paths x 10 days"));
    assert!(report.contains("Initial price: 100.00"));
    assert!(report.contains("Expected final price: 100.00"));
    assert!(!report.contains("NaN"));
  }
}
