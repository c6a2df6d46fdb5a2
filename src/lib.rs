//! Montecast - Monte Carlo forecasting engine for per-period case counts.
//!
//! This crate provides the simulation core of a case-count forecasting
//! service:
//! - Growth-rate estimation from a historical series
//! - Parallel Monte Carlo trajectory simulation
//! - Per-period ensemble statistics (mean, median, spread, percentile bands)
//!
//! Data loading, period aggregation and response shaping are the caller's
//! responsibility; the engine consumes a plain numeric series and returns one
//! statistics bundle per requested future period.

pub mod core;
pub mod engine;
pub mod stats;

pub use crate::core::{ForecastError, GrowthRateDistribution, HistoricalSeries, Result};
pub use crate::engine::{ForecastEngine, NormalSource, Xoshiro256, DEFAULT_SIMULATIONS};
pub use crate::stats::{ForecastResult, PeriodSummary};
