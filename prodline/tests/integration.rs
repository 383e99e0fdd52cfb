//! Integration tests for Prodline
//!
//! End-to-end behavior across the two-machine solution, the line aggregation
//! engine, the performance reporter and the structural aggregator.

use prodline::{
    AggregationMode, LinePerformance, MAX_AGGREGATION_ITERATIONS, RateUnit, StructuralConfig,
    TimeUnit, aggregate_line, aggregate_machines, compute_buffer_distribution,
    compute_line_performance, compute_two_machine_measures, generate_json_report,
};
use rand::Rng;

/// Test the reference two-machine scenario end to end.
#[test]
fn test_two_machine_scenario() {
    let measures = compute_two_machine_measures(0.8, 0.7, 5).unwrap();
    assert!((measures.production_rate - 0.6937).abs() < 1e-9);
    assert!((measures.work_in_process - 3.93).abs() < 1e-9);
    assert!((measures.blocking - 0.1063).abs() < 1e-9);
    assert!((measures.starvation - 0.0063).abs() < 1e-9);
}

/// Test that buffer distributions are proper distributions for arbitrary
/// machine pairs.
#[test]
fn test_random_distributions_sum_to_one() {
    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        let p1 = rng.gen_range(0.05..0.95);
        let p2 = rng.gen_range(0.05..0.95);
        let n = rng.gen_range(1..=12);

        let distribution = compute_buffer_distribution(p1, p2, n).unwrap();
        let total: f64 = distribution.iter().sum();
        assert!(
            (total - 1.0).abs() < 1e-9,
            "sum {total} for ({p1}, {p2}, {n})"
        );
        assert!(distribution.iter().all(|&value| (0.0..=1.0).contains(&value)));
    }
}

/// Test the conservation identities on arbitrary machine pairs: an up
/// machine either produces, or is blocked (upstream) / starved (downstream).
#[test]
fn test_random_conservation_identities() {
    let mut rng = rand::thread_rng();
    for _ in 0..200 {
        let p1 = rng.gen_range(0.05..0.95);
        let p2 = rng.gen_range(0.05..0.95);
        let n = rng.gen_range(1..=12);

        let measures = compute_two_machine_measures(p1, p2, n).unwrap();
        // The reported values are rounded to 4 decimals each.
        assert!((measures.production_rate + measures.blocking - p1).abs() < 1.5e-4);
        assert!((measures.production_rate + measures.starvation - p2).abs() < 1.5e-4);
    }
}

/// Test a three-machine line end to end against the reference values.
#[test]
fn test_three_machine_line() {
    let report = compute_line_performance(&[0.9, 0.8, 0.85], &[3, 3], 1.0).unwrap();

    // Boundary conditions survive into the report.
    assert!((report.forward[0] - 0.9).abs() < f64::EPSILON);
    assert!((report.backward[2] - 0.85).abs() < f64::EPSILON);

    assert!((report.production_rate - 0.7702).abs() < 1e-9);
    assert!((report.backward[0] - report.forward[2]).abs() <= 1.01e-4);
    assert!((report.total_work_in_process - 4.12).abs() < 1e-9);
    assert!((report.blocking[2] - 0.0).abs() < f64::EPSILON);
    assert!((report.starvation[0] - 0.0).abs() < f64::EPSILON);
}

/// Test that a long line converges comfortably inside the iteration cap and
/// that shrinking every buffer monotonically sheds work in process.
#[test]
fn test_long_line_regression() {
    let p = vec![0.95; 50];

    let aggregation = aggregate_line(&p, &vec![2; 49]).unwrap();
    assert!(aggregation.iterations < MAX_AGGREGATION_ITERATIONS);
    assert!(aggregation.iterations <= 200);

    let mut previous_total = f64::INFINITY;
    for capacity in [4, 3, 2, 1] {
        let report = compute_line_performance(&p, &vec![capacity; 49], 1.0).unwrap();
        assert!(
            report.total_work_in_process <= previous_total,
            "WIP grew when buffers shrank to {capacity}"
        );
        previous_total = report.total_work_in_process;
    }
}

/// Test the production-rate estimate of the 50-machine reference line.
#[test]
fn test_long_line_production_rate() {
    let report = compute_line_performance(&vec![0.95; 50], &vec![2; 49], 1.0).unwrap();
    assert!((report.production_rate - 0.8695).abs() < 1e-6);
}

/// Test the structural aggregator against the reference machine group.
#[test]
fn test_structural_aggregation() {
    let machine = aggregate_machines(
        &[1.5, 2.0, 1.7],
        &[10.0, 8.0, 9.0],
        &[90.0, 79.0, 85.0],
        &StructuralConfig::default(),
    )
    .unwrap();
    assert!((machine.capacity - 5.2).abs() < 1e-9);
    assert!((machine.up_time - 8.9175).abs() < 1e-9);
    assert!((machine.down_time - 84.4457).abs() < 1e-9);

    let series = aggregate_machines(
        &[1.5, 2.0, 1.7],
        &[10.0, 8.0, 9.0],
        &[90.0, 79.0, 85.0],
        &StructuralConfig {
            mode: AggregationMode::ConsecutiveDependent,
            ..Default::default()
        },
    )
    .unwrap();
    assert!((series.capacity - 1.5).abs() < 1e-9);
}

/// Test that declared units are honored on the way in and out.
#[test]
fn test_structural_units() {
    let config = StructuralConfig {
        capacity_unit: RateUnit::PartsPerMinute,
        up_time_unit: TimeUnit::Minutes,
        down_time_unit: TimeUnit::Minutes,
        ..Default::default()
    };
    let machine = aggregate_machines(
        &[90.0, 120.0, 102.0],
        &[10.0 / 60.0, 8.0 / 60.0, 9.0 / 60.0],
        &[90.0 / 60.0, 79.0 / 60.0, 85.0 / 60.0],
        &config,
    )
    .unwrap();
    // The same group as the seconds-based reference, scaled into minutes.
    assert!((machine.capacity - 312.0).abs() < 1e-9);
    assert!((machine.up_time - 0.1486).abs() < 1e-9);
    assert!((machine.down_time - 1.4074).abs() < 1e-9);
}

/// Test that a line report survives a JSON round trip.
#[test]
fn test_json_report_round_trip() {
    let report = compute_line_performance(&[0.9, 0.7, 0.95, 0.8, 0.85], &[2, 3, 2, 4], 1.0)
        .unwrap();
    let json = generate_json_report(&report).unwrap();
    assert!(json.contains("\"production_rate\""));

    let parsed: LinePerformance = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, report);
}
