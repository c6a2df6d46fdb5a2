//! Ensemble aggregation statistics.

pub mod summary;

pub use summary::{aggregate, percentile, ForecastResult, PeriodSummary};
