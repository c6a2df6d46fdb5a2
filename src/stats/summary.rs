//! Per-period summary statistics over a simulation ensemble.

use serde::{Deserialize, Serialize};

/// Summary statistics for one forecast period, taken across all simulated
/// trajectories at that period.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummary {
    /// Ensemble mean.
    pub mean: f64,
    /// Ensemble median (50th percentile).
    pub median: f64,
    /// Population standard deviation of the ensemble.
    pub std_dev: f64,
    /// Smallest simulated value.
    pub min: f64,
    /// Largest simulated value.
    pub max: f64,
    /// 5th percentile.
    pub p5: f64,
    /// 25th percentile.
    pub p25: f64,
    /// 75th percentile.
    pub p75: f64,
    /// 95th percentile.
    pub p95: f64,
}

impl PeriodSummary {
    /// Summary of an ensemble where every trajectory holds `value`.
    ///
    /// All location statistics collapse to the value and the spread is zero.
    pub fn constant(value: f64) -> Self {
        Self {
            mean: value,
            median: value,
            std_dev: 0.0,
            min: value,
            max: value,
            p5: value,
            p25: value,
            p75: value,
            p95: value,
        }
    }

    /// Compute the summary from one period's ensemble column.
    ///
    /// Sorts the column in place. An empty column yields the all-zero
    /// summary.
    pub fn from_column(column: &mut [f64]) -> Self {
        if column.is_empty() {
            return Self::constant(0.0);
        }

        column.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let n = column.len() as f64;
        let mean = column.iter().sum::<f64>() / n;
        let variance = column.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;

        Self {
            mean,
            median: percentile(column, 50.0),
            std_dev: variance.sqrt(),
            min: column[0],
            max: column[column.len() - 1],
            p5: percentile(column, 5.0),
            p25: percentile(column, 25.0),
            p75: percentile(column, 75.0),
            p95: percentile(column, 95.0),
        }
    }
}

/// Percentile of an ascending-sorted slice, linear interpolation between
/// order statistics.
///
/// `p` is in percent (0..=100). Empty input yields 0.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let rank = (p / 100.0).clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;

    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Aggregate an ensemble into one [`PeriodSummary`] per period column.
///
/// `ensemble` holds one row per trajectory; every row must have
/// `n_periods` entries.
pub fn aggregate(ensemble: &[Vec<f64>], n_periods: usize) -> ForecastResult {
    let mut periods = Vec::with_capacity(n_periods);
    let mut column = vec![0.0; ensemble.len()];

    for period in 0..n_periods {
        for (slot, row) in column.iter_mut().zip(ensemble.iter()) {
            *slot = row[period];
        }
        periods.push(PeriodSummary::from_column(&mut column));
    }

    ForecastResult::new(periods)
}

/// Ordered per-period forecast statistics, one bundle per future period.
///
/// Periods are relative to the end of the historical series; callers that
/// forecast past an alignment point and report only a suffix slice the
/// result themselves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    periods: Vec<PeriodSummary>,
}

impl ForecastResult {
    /// Create a result from per-period summaries.
    pub fn new(periods: Vec<PeriodSummary>) -> Self {
        Self { periods }
    }

    /// Result of `n` all-zero periods, for forecasts from no history.
    pub fn zeros(n: usize) -> Self {
        Self {
            periods: vec![PeriodSummary::constant(0.0); n],
        }
    }

    /// Number of forecast periods.
    #[inline]
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Check if no periods were forecast.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    /// Summary for one period, if in range.
    #[inline]
    pub fn get(&self, period: usize) -> Option<&PeriodSummary> {
        self.periods.get(period)
    }

    /// Borrow all per-period summaries in order.
    #[inline]
    pub fn periods(&self) -> &[PeriodSummary] {
        &self.periods
    }

    /// Per-period means, in order.
    pub fn means(&self) -> Vec<f64> {
        self.periods.iter().map(|p| p.mean).collect()
    }

    /// Per-period medians, in order.
    pub fn medians(&self) -> Vec<f64> {
        self.periods.iter().map(|p| p.median).collect()
    }

    /// Iterator over per-period summaries.
    pub fn iter(&self) -> impl Iterator<Item = &PeriodSummary> {
        self.periods.iter()
    }
}

impl IntoIterator for ForecastResult {
    type Item = PeriodSummary;
    type IntoIter = std::vec::IntoIter<PeriodSummary>;

    fn into_iter(self) -> Self::IntoIter {
        self.periods.into_iter()
    }
}
