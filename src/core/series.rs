//! Historical series and growth-rate estimation.

use serde::{Deserialize, Serialize};

/// An ordered series of per-period case counts.
///
/// One value per historical period, chronologically ordered. Values are
/// expected to be non-negative; the caller is responsible for aggregating
/// raw records into a single value per period before constructing the
/// series.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HistoricalSeries {
    values: Vec<f64>,
}

impl HistoricalSeries {
    /// Create a new series from per-period values.
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    /// Number of historical periods.
    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the series has no periods.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of the most recent period, if any.
    #[inline]
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied()
    }

    /// Borrow the per-period values.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Period-over-period fractional changes, `(curr - prev) / prev`.
    ///
    /// Transitions whose prior value is not strictly positive are skipped
    /// entirely rather than treated as zero growth, so the returned sample
    /// may be shorter than `len() - 1`.
    pub fn growth_rates(&self) -> Vec<f64> {
        self.values
            .windows(2)
            .filter(|pair| pair[0] > 0.0)
            .map(|pair| (pair[1] - pair[0]) / pair[0])
            .collect()
    }
}

impl From<Vec<f64>> for HistoricalSeries {
    fn from(values: Vec<f64>) -> Self {
        Self::new(values)
    }
}

impl From<&[f64]> for HistoricalSeries {
    fn from(values: &[f64]) -> Self {
        Self::new(values.to_vec())
    }
}

impl<const N: usize> From<[f64; N]> for HistoricalSeries {
    fn from(values: [f64; N]) -> Self {
        Self::new(values.to_vec())
    }
}

/// Mean and spread of period-over-period growth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrowthRateDistribution {
    /// Arithmetic mean of the growth-rate sample.
    pub mean: f64,
    /// Population standard deviation of the growth-rate sample
    /// (denominator = sample count, not count - 1).
    pub std_dev: f64,
}

impl GrowthRateDistribution {
    /// Estimate the distribution from a historical series.
    ///
    /// A series with fewer than two elements, or one whose prior values are
    /// all non-positive, yields no growth sample and degenerates to (0, 0).
    pub fn estimate(series: &HistoricalSeries) -> Self {
        let rates = series.growth_rates();
        if rates.is_empty() {
            return Self {
                mean: 0.0,
                std_dev: 0.0,
            };
        }

        let n = rates.len() as f64;
        let mean = rates.iter().sum::<f64>() / n;
        let variance = rates.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / n;

        Self {
            mean,
            std_dev: variance.sqrt(),
        }
    }

    /// Whether the spread is zero, making every trajectory identical.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.std_dev <= 0.0
    }
}
