//! # Stats
//!
//! $$
//! \bar x=\frac{1}{n}\sum_i x_i,\qquad
//! s^2=\frac{1}{n-1}\sum_i (x_i-\bar x)^2
//! $$
//!
//! Scalar helpers shared by the series, portfolio and report modules.
//! NaN entries count as missing observations, and statistics over an
//! insufficient number of observations return NaN rather than erroring.

use std::cmp::Ordering;

/// Sample mean over finite entries. NaN if none are finite.
pub fn sample_mean(xs: &[f64]) -> f64 {
  let mut sum = 0.0;
  let mut n = 0usize;

  for &x in xs {
    if x.is_finite() {
      sum += x;
      n += 1;
    }
  }

  if n == 0 {
    f64::NAN
  } else {
    sum / n as f64
  }
}

/// Sample standard deviation (n − 1 denominator) over finite entries.
/// NaN if fewer than two are finite.
pub fn sample_std(xs: &[f64]) -> f64 {
  let mean = sample_mean(xs);
  if mean.is_nan() {
    return f64::NAN;
  }

  let mut acc = 0.0;
  let mut n = 0usize;

  for &x in xs {
    if x.is_finite() {
      let d = x - mean;
      acc += d * d;
      n += 1;
    }
  }

  if n < 2 {
    f64::NAN
  } else {
    (acc / (n - 1) as f64).sqrt()
  }
}

/// Linearly interpolated quantile, `q` in `[0, 1]`. NaN entries are
/// excluded; NaN when no finite entries remain.
pub fn quantile(xs: &[f64], q: f64) -> f64 {
  let mut sorted: Vec<f64> = xs.iter().copied().filter(|x| x.is_finite()).collect();
  if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
    return f64::NAN;
  }

  sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

  let h = (sorted.len() - 1) as f64 * q;
  let lo = h.floor() as usize;
  let hi = h.ceil() as usize;

  if lo == hi {
    sorted[lo]
  } else {
    sorted[lo] + (h - lo as f64) * (sorted[hi] - sorted[lo])
  }
}
