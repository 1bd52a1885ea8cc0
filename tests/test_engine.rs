use rand::SeedableRng;
use rand::rngs::StdRng;

use mc_forecast::engine::{
    self, HISTOGRAM_BINS, Method, NormalFit, Series, SimulationRequest, build_histogram,
    differences, simulate, simulate_empirical, simulate_parametric, summarize,
};

fn series(values: &[f64]) -> Series {
    Series::new(values.to_vec()).unwrap()
}

// ── Difference extraction ───────────────────────────────────────────

#[test]
fn test_difference_length() {
    for len in 1..20 {
        let values: Vec<f64> = (0..len).map(|i| (i as f64 * 0.7).cos() * 10.0).collect();
        assert_eq!(differences(&values).len(), len - 1);
    }
}

// ── Simulators ──────────────────────────────────────────────────────

#[test]
fn test_simulators_return_requested_count() {
    let inputs = [vec![5.0], vec![5.0, 6.0], vec![10.0, 12.0, 11.0, 13.0]];
    for values in &inputs {
        let s = series(values);
        for n in [1, 2, 17, 1000] {
            let mut rng = StdRng::seed_from_u64(n as u64);
            assert_eq!(simulate_parametric(&s, n, &mut rng).unwrap().len(), n);
            assert_eq!(simulate_empirical(&s, n, &mut rng).len(), n);
        }
    }
}

#[test]
fn test_bootstrap_only_replays_observed_changes() {
    let s = series(&[3.0, 4.5, 4.0, 7.25, 6.0, 6.5]);
    let last = s.last();
    let candidates: Vec<f64> = s.differences().iter().map(|d| last + d).collect();

    let mut rng = StdRng::seed_from_u64(2024);
    for v in simulate_empirical(&s, 5000, &mut rng) {
        assert!(candidates.contains(&v), "{v} is not last + an observed change");
    }
}

#[test]
fn test_single_observation_empirical_is_flat() {
    let s = series(&[5.0]);
    let request = SimulationRequest::new(Method::Empirical, 100);
    let mut rng = StdRng::seed_from_u64(0);
    let values = simulate(&s, &request, &mut rng).unwrap();
    assert_eq!(values, vec![5.0; 100]);
}

#[test]
fn test_two_observations_parametric_is_point_mass() {
    let s = series(&[5.0, 8.0]);
    assert_eq!(
        NormalFit::from_differences(&s.differences()),
        NormalFit { mu: 3.0, sigma: 0.0 }
    );
    let mut rng = StdRng::seed_from_u64(0);
    let values = simulate_parametric(&s, 50, &mut rng).unwrap();
    assert!(values.iter().all(|&v| v == 11.0));
}

// ── Constant series scenario ────────────────────────────────────────

#[test]
fn test_constant_series_forecast() {
    let s = series(&[20.0, 20.0, 20.0]);
    assert_eq!(s.differences(), vec![0.0, 0.0]);
    assert_eq!(
        NormalFit::from_differences(&s.differences()),
        NormalFit { mu: 0.0, sigma: 0.0 }
    );

    let request = SimulationRequest::new(Method::Parametric, 10_000);
    let mut rng = StdRng::seed_from_u64(1);
    let values = simulate(&s, &request, &mut rng).unwrap();
    assert!(values.iter().all(|&v| v == 20.0));

    let stats = summarize(&values).unwrap();
    assert_eq!(stats.standard_deviation, Some(0.0));
    assert_eq!(stats.mean, 20.0);
    assert_eq!(stats.median, 20.0);

    let hist = build_histogram(&values).unwrap();
    assert_eq!(hist.total(), 10_000);
}

#[test]
fn test_constant_inexact_value_stays_point_mass() {
    for c in [21.7, 0.1] {
        let s = series(&[c, c, c]);
        for method in [Method::Parametric, Method::Empirical] {
            let mut rng = StdRng::seed_from_u64(5);
            let f = engine::forecast(&s, &SimulationRequest::new(method, 10_000), &mut rng).unwrap();
            assert_eq!(f.statistics.mean, c);
            assert_eq!(f.statistics.median, c);
            assert_eq!(f.statistics.standard_deviation, Some(0.0));
        }
    }
}

// ── Statistics and histogram ────────────────────────────────────────

#[test]
fn test_percentiles_monotone_on_simulations() {
    let s = series(&[10.0, 12.0, 11.0, 13.0, 12.5, 14.0, 13.2]);
    for method in [Method::Parametric, Method::Empirical] {
        let mut rng = StdRng::seed_from_u64(11);
        let f = engine::forecast(&s, &SimulationRequest::new(method, 3000), &mut rng).unwrap();
        let st = f.statistics;
        assert!(st.p10 <= st.p25);
        assert!(st.p25 <= st.median);
        assert!(st.median <= st.p75);
        assert!(st.p75 <= st.p90);
    }
}

#[test]
fn test_histogram_is_complete() {
    let s = series(&[1.0, 3.0, 2.0, 5.0, 4.0]);
    for n in [1, 2, 39, 40, 41, 12_345] {
        let mut rng = StdRng::seed_from_u64(n as u64);
        let values = simulate_parametric(&s, n, &mut rng).unwrap();
        let hist = build_histogram(&values).unwrap();
        assert_eq!(hist.counts.len(), HISTOGRAM_BINS);
        assert_eq!(hist.bin_edges.len(), HISTOGRAM_BINS + 1);
        assert_eq!(hist.total(), n as u64);
    }
}

#[test]
fn test_single_simulation_reports_undefined_std() {
    let s = series(&[10.0, 12.0]);
    let mut rng = StdRng::seed_from_u64(5);
    let f = engine::forecast(&s, &SimulationRequest::new(Method::Empirical, 1), &mut rng).unwrap();
    assert_eq!(f.statistics.standard_deviation, None);
    assert_eq!(f.statistics.mean, 14.0);
}

// ── Determinism ─────────────────────────────────────────────────────

#[test]
fn test_fixed_seed_is_reproducible() {
    let s = series(&[10.0, 12.0, 11.0, 13.0]);
    let request = SimulationRequest::new(Method::Parametric, 5000);

    let run = || {
        let mut rng = StdRng::seed_from_u64(42);
        engine::forecast(&s, &request, &mut rng).unwrap()
    };
    let a = run();
    let b = run();
    assert_eq!(a.statistics, b.statistics);
    assert_eq!(a.histogram, b.histogram);
    assert_eq!(
        a.statistics.mean.to_bits(),
        b.statistics.mean.to_bits()
    );
}

#[test]
fn test_parametric_matches_fitted_moments() {
    // diffs [2, -1, 2]: mu = 1, sigma = sqrt(3)
    let s = series(&[10.0, 12.0, 11.0, 13.0]);
    let mut rng = StdRng::seed_from_u64(9);
    let f = engine::forecast(&s, &SimulationRequest::new(Method::Parametric, 50_000), &mut rng)
        .unwrap();
    assert!((f.statistics.mean - 14.0).abs() < 0.05);
    let std = f.statistics.standard_deviation.unwrap();
    assert!((std - 3.0f64.sqrt()).abs() < 0.05);
}

#[test]
fn test_forecast_serializes() {
    let s = series(&[1.0, 2.0, 4.0]);
    let mut rng = StdRng::seed_from_u64(1);
    let f = engine::forecast(&s, &SimulationRequest::new(Method::Empirical, 10), &mut rng).unwrap();
    let json = serde_json::to_value(&f).unwrap();
    assert_eq!(json["method"], "empirical");
    assert_eq!(json["simulation_count"], 10);
    assert_eq!(json["histogram"]["counts"].as_array().unwrap().len(), HISTOGRAM_BINS);
}
