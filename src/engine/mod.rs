//! Monte Carlo forecast engine.

pub mod forecast;
pub mod rng;

pub use forecast::{ForecastEngine, DEFAULT_SIMULATIONS};
pub use rng::{entropy_seed, NormalSource, Xoshiro256};
