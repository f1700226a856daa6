//! # Simulation
//!
//! $$
//! S_t=S_0\exp\Big(\textstyle\sum_{k\le t}\big((\mu-\tfrac{\sigma^2}{2})\Delta t+\sigma\sqrt{\Delta t}\,Z_k\big)\Big)
//! $$
//!
//! Monte Carlo projection of price paths.

pub mod montecarlo;

pub use montecarlo::MonteCarloEngine;
pub use montecarlo::SimulationMethod;
pub use montecarlo::SimulationResult;
