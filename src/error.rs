//! # Errors
//!
//! Structural failures raised at call boundaries. Statistical "cannot
//! compute" conditions are not errors: they degrade to `f64::NAN` and are
//! surfaced by the report layer as explicit placeholders.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, QuantError>;

#[derive(Debug, Error)]
pub enum QuantError {
  /// No price records are available where data is mandatory.
  #[error("no price data available for {0}")]
  EmptyInput(String),

  /// Portfolio members share no common dates after return alignment.
  #[error("portfolio series share no overlapping dates")]
  NoOverlap,

  /// Structurally invalid Monte Carlo parameters. Raised eagerly because
  /// NaN drift or volatility would corrupt every path silently.
  #[error("invalid simulation parameter: {0}")]
  InvalidSimulationParameter(String),
}
