//! Multi-Machine Performance Report
//!
//! Assembles the whole-line report from the converged aggregation
//! probabilities: per-buffer WIP, per-machine blocking and starvation, line
//! production rate, total WIP and throughput. Rounding happens here, at the
//! reporting boundary; the aggregation itself runs in full precision.

use crate::aggregation::aggregate_line;
use crate::two_machine::{empty_probability_raw, work_in_process_raw};
use crate::{LineError, round_to};
use serde::{Deserialize, Serialize};

/// Steady-state performance report for an M-machine line.
///
/// Read-only once assembled. `production_rate` equals `backward[0]`, and the
/// converged `forward[M-1]` agrees with it to within the aggregation
/// tolerance; the difference between the two is a cheap consistency probe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinePerformance {
    /// Machine availability probabilities as supplied.
    pub machine_probabilities: Vec<f64>,
    /// Forward-aggregated equivalent probabilities.
    pub forward: Vec<f64>,
    /// Backward-aggregated equivalent probabilities.
    pub backward: Vec<f64>,
    /// Buffer capacities as supplied.
    pub buffer_capacities: Vec<usize>,
    /// Parts produced per cycle by the line as a whole, rounded to 4 decimals.
    pub production_rate: f64,
    /// Expected occupancy per buffer (one entry per buffer), rounded to 2
    /// decimals.
    pub work_in_process: Vec<f64>,
    /// Blocking probability per machine, rounded to 4 decimals; the last
    /// machine discharges into the outside world and is never blocked.
    pub blocking: Vec<f64>,
    /// Starvation probability per machine, rounded to 4 decimals; the first
    /// machine draws from an unlimited source and is never starved.
    pub starvation: Vec<f64>,
    /// Sum of the unrounded per-buffer occupancies, rounded to 2 decimals.
    pub total_work_in_process: f64,
    /// Production rate per unit of cycle time, rounded to 4 decimals.
    pub throughput: f64,
}

/// Compute the steady-state performance report of an M-machine line.
///
/// Runs the aggregation engine, then reads every stage as a two-machine
/// subsystem between its forward and backward equivalent machines. All
/// validation happens before the first sweep; the first failure propagates
/// and no partial report is returned.
pub fn compute_line_performance(
    p: &[f64],
    n: &[usize],
    cycle_time: f64,
) -> Result<LinePerformance, LineError> {
    if !(cycle_time.is_finite() && cycle_time > 0.0) {
        return Err(LineError::InvalidCycleTime { value: cycle_time });
    }

    let aggregation = aggregate_line(p, n)?;
    let forward = aggregation.forward;
    let backward = aggregation.backward;
    let machines = p.len();

    // Rounding can pull an aggregated probability of a near-dead machine to
    // exactly zero; the stage formulas need every equivalent machine alive.
    if forward.iter().any(|&value| value <= 0.0) {
        return Err(LineError::DegenerateProbability { name: "p_f" });
    }
    if backward.iter().any(|&value| value <= 0.0) {
        return Err(LineError::DegenerateProbability { name: "p_b" });
    }

    let production_rate = round_to(backward[0], 4);

    let mut work_in_process = Vec::with_capacity(machines - 1);
    for i in 0..machines - 1 {
        work_in_process.push(work_in_process_raw(forward[i], backward[i + 1], n[i]));
    }
    let total_work_in_process = round_to(work_in_process.iter().sum(), 2);
    for value in work_in_process.iter_mut() {
        *value = round_to(*value, 2);
    }

    let mut blocking = Vec::with_capacity(machines);
    for i in 0..machines - 1 {
        let empty = empty_probability_raw(backward[i + 1], forward[i], n[i]);
        blocking.push(round_to(p[i] * empty, 4));
    }
    blocking.push(0.0);

    let mut starvation = Vec::with_capacity(machines);
    starvation.push(0.0);
    for i in 1..machines {
        let empty = empty_probability_raw(forward[i - 1], backward[i], n[i - 1]);
        starvation.push(round_to(p[i] * empty, 4));
    }

    let throughput = round_to(production_rate / cycle_time, 4);

    Ok(LinePerformance {
        machine_probabilities: p.to_vec(),
        forward,
        backward,
        buffer_capacities: n.to_vec(),
        production_rate,
        work_in_process,
        blocking,
        starvation,
        total_work_in_process,
        throughput,
    })
}

/// Generate a prettified JSON report.
///
/// Serializes the line performance report into machine-readable JSON.
pub fn generate_json_report(report: &LinePerformance) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(report)
}
