//! # Market Data
//!
//! $$
//! r_i=\ln\frac{C_i}{C_{i-1}}
//! $$
//!
//! Historical OHLCV records and per-asset derived statistics.

pub mod record;
pub mod series;

pub use record::PriceRecord;
pub use series::PriceSeries;
pub use series::SeriesSummary;
