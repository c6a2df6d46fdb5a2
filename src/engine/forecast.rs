//! Monte Carlo forward simulation of per-period case counts.
//!
//! Each trajectory compounds the last historical value forward, re-drawing a
//! growth rate from Normal(mean, std) at every step. Trajectories are
//! independent and run in parallel chunks via Rayon, one jumped PRNG stream
//! per chunk.

use std::sync::atomic::{AtomicBool, Ordering};

use rayon::prelude::*;

use crate::core::{ForecastError, GrowthRateDistribution, HistoricalSeries, Result};
use crate::engine::rng::{entropy_seed, NormalSource, Xoshiro256};
use crate::stats::{self, ForecastResult, PeriodSummary};

/// Default number of simulated trajectories per forecast.
pub const DEFAULT_SIMULATIONS: usize = 10_000;

/// Trajectories served by one jumped PRNG stream. Streams are laid out by
/// trajectory index, not by worker thread, so a seeded forecast is identical
/// on any thread count.
const TRAJECTORIES_PER_STREAM: usize = 1024;

/// Monte Carlo forecast engine.
///
/// Construction eagerly estimates the growth-rate distribution from the
/// historical series; the engine is immutable afterwards, so any number of
/// `predict` calls may run concurrently. Without an explicit seed every call
/// draws fresh entropy and runs are not reproducible bit-for-bit; callers
/// needing determinism use [`ForecastEngine::with_seed`] or inject their own
/// [`NormalSource`].
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    series: HistoricalSeries,
    growth: GrowthRateDistribution,
    n_simulations: usize,
    seed: Option<u64>,
}

impl ForecastEngine {
    /// Create an engine over a historical series.
    ///
    /// Degenerate history (empty, single-element, or without any
    /// positive-denominator transition) is accepted and yields a (0, 0)
    /// growth distribution. A zero simulation count is a caller error.
    pub fn new(series: impl Into<HistoricalSeries>, n_simulations: usize) -> Result<Self> {
        if n_simulations == 0 {
            return Err(ForecastError::invalid_parameter(
                "simulation count must be positive",
            ));
        }

        let series = series.into();
        let growth = GrowthRateDistribution::estimate(&series);

        Ok(Self {
            series,
            growth,
            n_simulations,
            seed: None,
        })
    }

    /// Create an engine with the default simulation count.
    pub fn with_defaults(series: impl Into<HistoricalSeries>) -> Self {
        let series = series.into();
        let growth = GrowthRateDistribution::estimate(&series);

        Self {
            series,
            growth,
            n_simulations: DEFAULT_SIMULATIONS,
            seed: None,
        }
    }

    /// Fix the base PRNG seed for reproducible forecasts.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Mean of the estimated growth-rate distribution.
    #[inline]
    pub fn mean_growth_rate(&self) -> f64 {
        self.growth.mean
    }

    /// Population standard deviation of the estimated growth-rate
    /// distribution.
    #[inline]
    pub fn std_growth_rate(&self) -> f64 {
        self.growth.std_dev
    }

    /// The estimated growth-rate distribution.
    #[inline]
    pub fn growth(&self) -> GrowthRateDistribution {
        self.growth
    }

    /// Number of trajectories simulated per forecast.
    #[inline]
    pub fn n_simulations(&self) -> usize {
        self.n_simulations
    }

    /// Borrow the historical series the engine was built from.
    #[inline]
    pub fn series(&self) -> &HistoricalSeries {
        &self.series
    }

    /// Forecast `n_periods` future periods.
    ///
    /// Never fails: an empty history yields all-zero statistics and
    /// `n_periods == 0` yields an empty result. With zero growth spread the
    /// forecast is fully deterministic and touches no random state.
    pub fn predict(&self, n_periods: usize) -> ForecastResult {
        if n_periods == 0 {
            return ForecastResult::default();
        }
        if self.series.is_empty() {
            return ForecastResult::zeros(n_periods);
        }
        if self.growth.is_degenerate() {
            return self.deterministic_forecast(n_periods);
        }

        let seed = self.seed.unwrap_or_else(entropy_seed);
        // Without a cancel flag the simulation cannot fail
        self.simulate(n_periods, seed, None)
            .map(|ensemble| stats::aggregate(&ensemble, n_periods))
            .unwrap_or_default()
    }

    /// Forecast with cooperative cancellation.
    ///
    /// Same semantics as [`ForecastEngine::predict`], but polls `cancel`
    /// between trajectories and returns [`ForecastError::Cancelled`] once it
    /// is raised. Large `n_simulations x n_periods` forecasts are CPU-bound
    /// and otherwise run to completion.
    pub fn predict_cancellable(
        &self,
        n_periods: usize,
        cancel: &AtomicBool,
    ) -> Result<ForecastResult> {
        if cancel.load(Ordering::Relaxed) {
            return Err(ForecastError::Cancelled);
        }
        if n_periods == 0 {
            return Ok(ForecastResult::default());
        }
        if self.series.is_empty() {
            return Ok(ForecastResult::zeros(n_periods));
        }
        if self.growth.is_degenerate() {
            return Ok(self.deterministic_forecast(n_periods));
        }

        let seed = self.seed.unwrap_or_else(entropy_seed);
        let ensemble = self.simulate(n_periods, seed, Some(cancel))?;
        Ok(stats::aggregate(&ensemble, n_periods))
    }

    /// Forecast drawing every normal sample from an injected source.
    ///
    /// Runs trajectories sequentially in order, so a scripted or seeded
    /// source makes the full ensemble deterministic. The degenerate branches
    /// behave exactly as in [`ForecastEngine::predict`] and consume no
    /// samples.
    pub fn predict_with_source(
        &self,
        n_periods: usize,
        source: &mut dyn NormalSource,
    ) -> ForecastResult {
        if n_periods == 0 {
            return ForecastResult::default();
        }
        if self.series.is_empty() {
            return ForecastResult::zeros(n_periods);
        }
        if self.growth.is_degenerate() {
            return self.deterministic_forecast(n_periods);
        }

        let last = self.series.last().unwrap_or(0.0);
        let ensemble: Vec<Vec<f64>> = (0..self.n_simulations)
            .map(|_| self.walk(n_periods, last, source))
            .collect();

        stats::aggregate(&ensemble, n_periods)
    }

    /// Zero-spread forecast: every trajectory compounds the mean growth rate
    /// identically, so the ensemble collapses to a single path with zero
    /// spread and all percentiles equal to the mean.
    fn deterministic_forecast(&self, n_periods: usize) -> ForecastResult {
        let mut current = self.series.last().unwrap_or(0.0);
        let mut periods = Vec::with_capacity(n_periods);

        for _ in 0..n_periods {
            current = (current * (1.0 + self.growth.mean)).max(0.0);
            periods.push(PeriodSummary::constant(current));
        }

        ForecastResult::new(periods)
    }

    /// Run the full ensemble in parallel chunks.
    ///
    /// Returns one row per trajectory. The ensemble buffer is owned by this
    /// call and dropped after aggregation.
    fn simulate(
        &self,
        n_periods: usize,
        seed: u64,
        cancel: Option<&AtomicBool>,
    ) -> Result<Vec<Vec<f64>>> {
        let last = self.series.last().unwrap_or(0.0);
        let streams = self.streams(seed);

        let chunks: Result<Vec<Vec<Vec<f64>>>> = streams
            .into_par_iter()
            .enumerate()
            .map(|(chunk_idx, mut rng)| {
                let start = chunk_idx * TRAJECTORIES_PER_STREAM;
                let end = (start + TRAJECTORIES_PER_STREAM).min(self.n_simulations);
                let mut rows = Vec::with_capacity(end - start);

                for _ in start..end {
                    if let Some(flag) = cancel {
                        if flag.load(Ordering::Relaxed) {
                            return Err(ForecastError::Cancelled);
                        }
                    }
                    rows.push(self.walk(n_periods, last, &mut rng));
                }

                Ok(rows)
            })
            .collect();

        Ok(chunks?.into_iter().flatten().collect())
    }

    /// One simulated trajectory starting from the last historical value.
    fn walk(&self, n_periods: usize, start: f64, source: &mut dyn NormalSource) -> Vec<f64> {
        let mut current = start;
        let mut path = Vec::with_capacity(n_periods);

        for _ in 0..n_periods {
            // Growth is re-sampled independently at every step, not fixed
            // per trajectory
            let growth = self.growth.mean + self.growth.std_dev * source.next_standard_normal();
            current = (current * (1.0 + growth)).max(0.0);
            path.push(current);
        }

        path
    }

    /// Disjoint PRNG streams, one per trajectory chunk.
    fn streams(&self, seed: u64) -> Vec<Xoshiro256> {
        let count =
            (self.n_simulations + TRAJECTORIES_PER_STREAM - 1) / TRAJECTORIES_PER_STREAM;
        let mut base = Xoshiro256::new(seed);

        (0..count)
            .map(|_| {
                let rng = base.clone();
                base.jump();
                rng
            })
            .collect()
    }
}
