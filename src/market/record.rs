//! # Price Record
//!
//! One OHLCV observation for a single ticker. Cleaning (deduplication,
//! outlier trimming, NA filling) is the data-acquisition layer's job; the
//! analytics core assumes chronologically consistent input.

use chrono::NaiveDate;
use impl_new_derive::ImplNew;

/// A single daily OHLCV observation.
///
/// Records used for return computation must have `close > 0`; non-positive
/// closes yield NaN returns, which downstream statistics treat as missing.
#[derive(ImplNew, Clone, Debug, PartialEq)]
pub struct PriceRecord {
  pub date: NaiveDate,
  pub open: f64,
  pub high: f64,
  pub low: f64,
  pub close: f64,
  pub volume: f64,
  pub ticker: String,
}
