//! # Quantfolio
//!
//! $$
//! \sigma_{ann}=\sigma_{daily}\sqrt{252},\qquad
//! S_t = S_0\exp\Big(\textstyle\sum_{k\le t}\big((\mu-\tfrac{\sigma^2}{2})\Delta t+\sigma\sqrt{\Delta t}\,Z_k\big)\Big)
//! $$
//!
//! `quantfolio` analyzes historical price series and portfolios: per-asset
//! return/risk statistics, covariance-based portfolio risk metrics
//! (VaR/CVaR, diversification) and Monte Carlo price-path projection under
//! Geometric Brownian Motion.
//!
//! ## Modules
//!
//! | Module         | Description                                                              |
//! |----------------|--------------------------------------------------------------------------|
//! | [`market`]     | OHLCV price records and per-asset derived statistics.                    |
//! | [`portfolio`]  | Multi-asset aggregation, weighting schemes and portfolio risk metrics.   |
//! | [`simulation`] | Monte Carlo price-path simulation engine.                                |
//! | [`report`]     | Markdown-style formatters over computed metrics.                         |
//! | [`stats`]      | Shared scalar statistics helpers.                                        |
//! | [`error`]      | Error taxonomy.                                                          |
//!
//! Data flows one way: raw records → [`market::PriceSeries`] →
//! [`portfolio::Portfolio`] → [`simulation::MonteCarloEngine`] → [`report`].
//! Statistics that cannot be computed degrade to `f64::NAN` and are rendered
//! as `n/a` by the report layer; structural misuse (invalid simulation
//! parameters, empty inputs where data is mandatory) fails eagerly with a
//! [`error::QuantError`].

pub mod error;
pub mod market;
pub mod portfolio;
pub mod report;
pub mod simulation;
pub mod stats;

/// Trading days per year used for annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
/// Default per-step time increment (one trading day in year units).
pub const DEFAULT_DT: f64 = 1.0 / TRADING_DAYS_PER_YEAR;

pub use error::QuantError;
pub use error::Result;
pub use market::PriceRecord;
pub use market::PriceSeries;
pub use portfolio::GlobalMetrics;
pub use portfolio::Portfolio;
pub use simulation::MonteCarloEngine;
pub use simulation::SimulationMethod;
pub use simulation::SimulationResult;
