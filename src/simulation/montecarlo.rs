//! # Monte Carlo Engine
//!
//! $$
//! S_t = S_0\,e^{\sum_{k\le t}\left((\mu-\sigma^2/2)\Delta t+\sigma\sqrt{\Delta t}\,Z_k\right)}
//! $$
//!
//! Forward price-path simulation. The GBM method uses the discretized exact
//! solution of the log-price SDE (multiplicative cumulative update), which
//! carries no step-compounding bias and stays numerically stable over long
//! horizons. Paths are independent, so the simulation axis is filled in
//! parallel; per-path RNG streams are derived from the base seed, keeping
//! seeded runs bit-identical regardless of scheduling.

use impl_new_derive::ImplNew;
use ndarray::parallel::prelude::*;
use ndarray::Array1;
use ndarray::Array2;
use ndarray::ArrayView1;
use ndarray::ArrayViewMut1;
use ndarray::Axis;
use ndarray_rand::RandomExt;
use rand::rngs::StdRng;
use rand::Rng;
use rand::SeedableRng;
use rand_distr::Normal;
use rand_distr::StandardNormal;

use crate::error::QuantError;
use crate::error::Result;
use crate::stats;
use crate::DEFAULT_DT;

/// Path update rule.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationMethod {
  /// Closed-form multiplicative GBM update (default).
  #[default]
  Gbm,
  /// Simple recursion `S_t = S_{t-1}(1 + N(mu, sigma))`. Kept for
  /// comparison; carries higher discretization error than [`Self::Gbm`].
  Additive,
}

/// Monte Carlo price-path simulator.
///
/// `mu` and `sigma` passed to [`MonteCarloEngine::simulate`] are per-step
/// (daily) figures, not annualized: annualized inputs silently produce
/// wrong magnitudes, and the engine cannot tell the difference. A seeded
/// engine is deterministic; an unseeded one is non-reproducible by design.
#[derive(ImplNew, Clone, Copy, Debug)]
pub struct MonteCarloEngine {
  /// Time increment per step, in the same unit system as `mu`/`sigma`.
  pub dt: f64,
  /// Base seed for reproducible runs.
  pub seed: Option<u64>,
  pub method: SimulationMethod,
}

impl Default for MonteCarloEngine {
  fn default() -> Self {
    Self {
      dt: DEFAULT_DT,
      seed: None,
      method: SimulationMethod::Gbm,
    }
  }
}

impl MonteCarloEngine {
  /// Simulate `num_simulations` paths of `num_days` steps each, starting at
  /// `initial_price`. Returns a fresh (num_days × num_simulations) matrix,
  /// one path per column, with `paths[0] = initial_price` on every column.
  ///
  /// Parameters are validated eagerly: NaN drift or volatility would flow
  /// through the exponential and corrupt the whole matrix silently.
  pub fn simulate(
    &self,
    initial_price: f64,
    mu: f64,
    sigma: f64,
    num_days: usize,
    num_simulations: usize,
  ) -> Result<SimulationResult> {
    self.validate(initial_price, mu, sigma, num_days, num_simulations)?;

    let shock = Normal::new(mu, sigma)
      .map_err(|e| QuantError::InvalidSimulationParameter(format!("shock distribution: {e}")))?;

    let base_seed = self.seed.unwrap_or_else(|| rand::thread_rng().gen());
    let drift_dt = (mu - 0.5 * sigma * sigma) * self.dt;
    let vol_sdt = sigma * self.dt.sqrt();
    let method = self.method;

    let mut paths = Array2::<f64>::zeros((num_days, num_simulations));
    paths
      .axis_iter_mut(Axis(1))
      .into_par_iter()
      .enumerate()
      .for_each(|(i, mut col)| {
        let mut rng = StdRng::seed_from_u64(path_seed(base_seed, i as u64));
        match method {
          SimulationMethod::Gbm => fill_gbm(&mut col, &mut rng, initial_price, drift_dt, vol_sdt),
          SimulationMethod::Additive => {
            fill_additive(&mut col, &mut rng, initial_price, &shock)
          }
        }
      });

    Ok(SimulationResult {
      paths,
      initial_price,
      mu,
      sigma,
      dt: self.dt,
      method,
    })
  }

  fn validate(
    &self,
    initial_price: f64,
    mu: f64,
    sigma: f64,
    num_days: usize,
    num_simulations: usize,
  ) -> Result<()> {
    if !initial_price.is_finite() || initial_price <= 0.0 {
      return Err(QuantError::InvalidSimulationParameter(format!(
        "initial price must be finite and positive, got {initial_price}"
      )));
    }
    if !mu.is_finite() {
      return Err(QuantError::InvalidSimulationParameter(format!(
        "mu must be finite, got {mu}"
      )));
    }
    if !sigma.is_finite() || sigma < 0.0 {
      return Err(QuantError::InvalidSimulationParameter(format!(
        "sigma must be finite and non-negative, got {sigma}"
      )));
    }
    if num_days == 0 || num_simulations == 0 {
      return Err(QuantError::InvalidSimulationParameter(format!(
        "num_days and num_simulations must be positive, got {num_days}x{num_simulations}"
      )));
    }
    if !self.dt.is_finite() || self.dt <= 0.0 {
      return Err(QuantError::InvalidSimulationParameter(format!(
        "dt must be finite and positive, got {}",
        self.dt
      )));
    }

    Ok(())
  }
}

/// Dense matrix of simulated prices, one path per column, together with the
/// parameters that generated it. Created fresh per call and never mutated
/// after being handed to the caller.
#[derive(Clone, Debug)]
pub struct SimulationResult {
  /// Shape (num_days, num_simulations).
  pub paths: Array2<f64>,
  pub initial_price: f64,
  pub mu: f64,
  pub sigma: f64,
  pub dt: f64,
  pub method: SimulationMethod,
}

impl SimulationResult {
  pub fn num_days(&self) -> usize {
    self.paths.nrows()
  }

  pub fn num_simulations(&self) -> usize {
    self.paths.ncols()
  }

  /// One simulated path.
  pub fn path(&self, i: usize) -> ArrayView1<'_, f64> {
    self.paths.column(i)
  }

  /// Terminal price of every path.
  pub fn final_prices(&self) -> ArrayView1<'_, f64> {
    self.paths.row(self.paths.nrows() - 1)
  }

  /// Mean terminal price across paths.
  pub fn expected_final_price(&self) -> f64 {
    stats::sample_mean(self.final_prices().as_slice().unwrap_or(&[]))
  }
}

/// SplitMix64-style stream derivation so paths stay decorrelated while a
/// fixed base seed reproduces the full matrix.
fn path_seed(base: u64, path: u64) -> u64 {
  let mut z = base ^ path.wrapping_mul(0x9E37_79B9_7F4A_7C15);
  z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
  z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
  z ^ (z >> 31)
}

fn fill_gbm(
  col: &mut ArrayViewMut1<'_, f64>,
  rng: &mut StdRng,
  initial_price: f64,
  drift_dt: f64,
  vol_sdt: f64,
) {
  col[0] = initial_price;

  // One vector of standard-normal draws per path, cumulated in log space.
  let gn = Array1::<f64>::random_using(col.len() - 1, StandardNormal, rng);
  let mut log_acc = 0.0;

  for t in 1..col.len() {
    log_acc += drift_dt + vol_sdt * gn[t - 1];
    col[t] = initial_price * log_acc.exp();
  }
}

fn fill_additive(
  col: &mut ArrayViewMut1<'_, f64>,
  rng: &mut StdRng,
  initial_price: f64,
  shock: &Normal<f64>,
) {
  col[0] = initial_price;

  for t in 1..col.len() {
    let r: f64 = rng.sample(*shock);
    col[t] = col[t - 1] * (1.0 + r);
  }
}
