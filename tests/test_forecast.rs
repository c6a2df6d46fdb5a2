//! Integration tests for the Montecast forecast engine.

use std::sync::atomic::AtomicBool;

use montecast::{ForecastEngine, ForecastError, NormalSource, PeriodSummary};

/// Scripted source that cycles through a fixed sample sequence.
struct CycleSource {
    samples: Vec<f64>,
    idx: usize,
}

impl CycleSource {
    fn new(samples: Vec<f64>) -> Self {
        Self { samples, idx: 0 }
    }
}

impl NormalSource for CycleSource {
    fn next_standard_normal(&mut self) -> f64 {
        let sample = self.samples[self.idx % self.samples.len()];
        self.idx += 1;
        sample
    }
}

/// Yearly case counts with visible noise around an upward trend.
fn noisy_series() -> Vec<f64> {
    vec![120.0, 180.0, 150.0, 240.0, 210.0, 300.0]
}

#[test]
fn test_short_history_zero_growth() {
    for values in [vec![], vec![500.0]] {
        let engine = ForecastEngine::with_defaults(values);
        assert_eq!(engine.mean_growth_rate(), 0.0);
        assert_eq!(engine.std_growth_rate(), 0.0);
    }
}

#[test]
fn test_constant_growth_exact_forecast() {
    let engine = ForecastEngine::new(vec![100.0, 150.0, 225.0], 10_000).unwrap();
    assert_eq!(engine.mean_growth_rate(), 0.5);
    assert_eq!(engine.std_growth_rate(), 0.0);

    let result = engine.predict(2);
    let first = result.get(0).unwrap();
    let second = result.get(1).unwrap();

    assert_eq!(first.mean, 337.5);
    assert_eq!(first.median, 337.5);
    assert_eq!(first.min, 337.5);
    assert_eq!(first.max, 337.5);
    assert_eq!(first.std_dev, 0.0);
    assert_eq!(first.p5, 337.5);
    assert_eq!(first.p95, 337.5);

    assert_eq!(second.mean, 506.25);
    assert_eq!(second.std_dev, 0.0);
    assert_eq!(second.p25, 506.25);
    assert_eq!(second.p75, 506.25);
}

#[test]
fn test_empty_history_all_zero_bundles() {
    let engine = ForecastEngine::with_defaults(Vec::new());
    for n in [0usize, 1, 5] {
        let result = engine.predict(n);
        assert_eq!(result.len(), n);
        for p in result.iter() {
            assert_eq!(*p, PeriodSummary::constant(0.0));
        }
    }
}

#[test]
fn test_simulated_values_never_negative() {
    // Growth sample [-0.4, -0.833..] has a strongly negative mean
    let engine = ForecastEngine::new(vec![100.0, 60.0, 10.0], 5_000)
        .unwrap()
        .with_seed(2024);
    assert!(engine.mean_growth_rate() < -0.5);

    let result = engine.predict(10);
    assert_eq!(result.len(), 10);
    for p in result.iter() {
        assert!(p.min >= 0.0, "min went negative: {}", p.min);
        assert!(p.p5 >= 0.0);
        assert!(p.mean >= 0.0);
    }
}

#[test]
fn test_percentile_bands_ordered() {
    let engine = ForecastEngine::new(noisy_series(), 5_000)
        .unwrap()
        .with_seed(11);
    assert!(engine.std_growth_rate() > 0.0);

    for p in engine.predict(8).iter() {
        assert!(p.min <= p.p5);
        assert!(p.p5 <= p.p25);
        assert!(p.p25 <= p.median);
        assert!(p.median <= p.p75);
        assert!(p.p75 <= p.p95);
        assert!(p.p95 <= p.max);
    }
}

#[test]
fn test_zero_periods_all_empty() {
    let engine = ForecastEngine::new(noisy_series(), 1_000).unwrap();
    let result = engine.predict(0);
    assert!(result.is_empty());
    assert!(result.means().is_empty());
    assert!(result.medians().is_empty());
    assert!(result.periods().is_empty());
}

#[test]
fn test_degenerate_path_bit_identical() {
    let engine = ForecastEngine::new(vec![100.0, 150.0, 225.0], 10_000).unwrap();
    let a = engine.predict(6);
    let b = engine.predict(6);
    assert_eq!(a, b);
}

#[test]
fn test_seeded_forecast_reproducible() {
    let a = ForecastEngine::new(noisy_series(), 3_000).unwrap().with_seed(77);
    let b = ForecastEngine::new(noisy_series(), 3_000).unwrap().with_seed(77);
    assert_eq!(a.predict(5), b.predict(5));
}

#[test]
fn test_injected_zero_source_matches_mean_path() {
    // Growth sample [0.5, 0.5, 0.0] -> mean 1/3, spread > 0
    let engine = ForecastEngine::new(vec![100.0, 150.0, 225.0, 225.0], 200).unwrap();
    assert!(engine.std_growth_rate() > 0.0);

    let mut source = CycleSource::new(vec![0.0]);
    let result = engine.predict_with_source(2, &mut source);

    let expected_1 = 225.0 * (1.0 + engine.mean_growth_rate());
    let expected_2 = expected_1 * (1.0 + engine.mean_growth_rate());

    let first = result.get(0).unwrap();
    let second = result.get(1).unwrap();
    assert!((first.mean - expected_1).abs() < 1e-9);
    assert!((second.mean - expected_2).abs() < 1e-9);
    // Every trajectory is identical under a constant source
    assert!(first.std_dev < 1e-9);
    assert!((first.max - first.min).abs() < 1e-9);
}

#[test]
fn test_injected_source_spreads_ensemble() {
    let engine = ForecastEngine::new(noisy_series(), 100).unwrap();
    // Cycle length 2 against 3 draws per trajectory keeps trajectories from
    // all receiving the same sample pattern
    let mut source = CycleSource::new(vec![-1.0, 0.5]);
    let result = engine.predict_with_source(3, &mut source);

    assert_eq!(result.len(), 3);
    for p in result.iter() {
        assert!(p.min >= 0.0);
        assert!(p.min <= p.max);
    }
    // The cycling source produces distinct trajectories
    let last = result.get(2).unwrap();
    assert!(last.std_dev > 0.0);
}

#[test]
fn test_cancellation() {
    let engine = ForecastEngine::new(noisy_series(), 2_000).unwrap().with_seed(5);

    let raised = AtomicBool::new(true);
    assert!(matches!(
        engine.predict_cancellable(4, &raised),
        Err(ForecastError::Cancelled)
    ));

    let unraised = AtomicBool::new(false);
    let result = engine.predict_cancellable(4, &unraised).unwrap();
    assert_eq!(result, engine.predict(4));
}

#[test]
fn test_walk_forward_prefix_discard() {
    // The service layer may forecast past an alignment point and report only
    // a suffix of the periods; the result just needs to stay ordered.
    let engine = ForecastEngine::new(noisy_series(), 1_000).unwrap().with_seed(31);
    let result = engine.predict(7);
    let reported = &result.periods()[3..];
    assert_eq!(reported.len(), 4);
    assert_eq!(reported[0], *result.get(3).unwrap());
}

#[test]
fn test_result_serializes_for_response_shaping() {
    let engine = ForecastEngine::new(vec![100.0, 150.0, 225.0], 100).unwrap();
    let result = engine.predict(1);

    let json = serde_json::to_value(&result).unwrap();
    let periods = json.get("periods").unwrap().as_array().unwrap();
    assert_eq!(periods.len(), 1);
    assert_eq!(periods[0].get("mean").unwrap().as_f64().unwrap(), 337.5);
    assert_eq!(periods[0].get("p95").unwrap().as_f64().unwrap(), 337.5);
}

#[test]
fn test_large_forecast_statistics_sane() {
    let engine = ForecastEngine::new(noisy_series(), 10_000)
        .unwrap()
        .with_seed(404);
    let result = engine.predict(3);

    // Mean growth is positive, so the central forecast should not collapse
    let first = result.get(0).unwrap();
    assert!(first.mean > 0.0);
    assert!(first.std_dev > 0.0);
    // Band should bracket the median with room on both sides
    assert!(first.p5 < first.median);
    assert!(first.median < first.p95);
}
