//! Core types for the forecast engine.

pub mod error;
pub mod series;

pub use error::{ForecastError, Result};
pub use series::{GrowthRateDistribution, HistoricalSeries};
