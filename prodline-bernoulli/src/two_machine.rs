//! Two-Machine Exact Solution
//!
//! Closed-form stationary analysis of an isolated two-machine Bernoulli line
//! with a finite buffer. Everything here is exact; the multi-machine
//! aggregation engine leans on these formulas as its inner kernel.
//!
//! The closed forms split on `p1 == p2`; the split is taken on a small
//! tolerance rather than exact float equality, since the flow-ratio formulas
//! degenerate to 0/0 as the probabilities approach each other.

use crate::{LineError, PROBABILITY_EQUALITY_TOLERANCE, round_to};
use serde::{Deserialize, Serialize};

/// Performance measures of an isolated two-machine line.
///
/// `blocking` refers to the first (upstream) machine, `starvation` to the
/// second (downstream) machine; the outer ends of a two-machine line are
/// never blocked or starved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TwoMachineMeasures {
    /// Expected parts produced per cycle, rounded to 4 decimals.
    pub production_rate: f64,
    /// Expected buffer occupancy at steady state, rounded to 2 decimals.
    pub work_in_process: f64,
    /// Probability the first machine is up but the full buffer and a failed
    /// consumer keep it from discharging, rounded to 4 decimals.
    pub blocking: f64,
    /// Probability the second machine is up but finds the buffer empty,
    /// rounded to 4 decimals.
    pub starvation: f64,
}

/// Ratio of the two machines' flow intensities.
///
/// Greater than 1 when the upstream machine outruns the downstream one, in
/// which case the buffer fills; below 1 it drains.
fn flow_ratio(p1: f64, p2: f64) -> f64 {
    p1 * (1.0 - p2) / (p2 * (1.0 - p1))
}

fn nearly_equal(p1: f64, p2: f64) -> bool {
    (p1 - p2).abs() < PROBABILITY_EQUALITY_TOLERANCE
}

fn validate_probability(value: f64, name: &'static str) -> Result<(), LineError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(LineError::InvalidProbability { name, value });
    }
    Ok(())
}

fn validate_capacity(n: usize, name: &'static str) -> Result<(), LineError> {
    if n == 0 {
        return Err(LineError::InvalidCapacity { name });
    }
    Ok(())
}

/// Empty-buffer probability for arguments already validated into `[0, 1]`
/// with a nonzero second machine.
///
/// The `p1 = 1` branch is the limit of the general formula as the flow ratio
/// grows without bound: a machine that never fails keeps the buffer occupied.
pub(crate) fn empty_probability_raw(p1: f64, p2: f64, n: usize) -> f64 {
    if nearly_equal(p1, p2) {
        return (1.0 - p1) / (n as f64 + 1.0 - p1);
    }
    if p1 >= 1.0 {
        return 0.0;
    }
    let ratio = flow_ratio(p1, p2);
    (1.0 - p1) * (1.0 - ratio) / (1.0 - p1 / p2 * ratio.powi(n as i32))
}

/// Expected buffer occupancy, full precision.
pub(crate) fn work_in_process_raw(p1: f64, p2: f64, n: usize) -> f64 {
    let capacity = n as f64;
    if nearly_equal(p1, p2) {
        return capacity * (capacity + 1.0) / (2.0 * (capacity + 1.0 - p1));
    }
    if p1 >= 1.0 {
        // Full-buffer limit, matching the empty-probability branch above.
        return capacity;
    }
    let ratio = flow_ratio(p1, p2);
    let ratio_n = ratio.powi(n as i32);
    p1 / (p2 - p1 * ratio_n) * ((1.0 - ratio_n) / (1.0 - ratio) - capacity * ratio_n)
}

/// Compute the stationary buffer-occupancy distribution.
///
/// Returns the probabilities of the buffer between the two machines holding
/// exactly `0..=n` parts; the entries sum to 1.
///
/// `p1` and `p2` are the per-cycle availability probabilities of the upstream
/// and downstream machine, `n` the buffer capacity in parts.
pub fn compute_buffer_distribution(p1: f64, p2: f64, n: usize) -> Result<Vec<f64>, LineError> {
    validate_probability(p1, "p1")?;
    validate_probability(p2, "p2")?;
    validate_capacity(n, "n")?;

    if nearly_equal(p1, p2) {
        let tail = 1.0 / (n as f64 + 1.0 - p1);
        let mut distribution = Vec::with_capacity(n + 1);
        distribution.push((1.0 - p1) * tail);
        distribution.resize(n + 1, tail);
        return Ok(distribution);
    }
    if p2 <= 0.0 {
        return Err(LineError::DegenerateProbability { name: "p2" });
    }
    if p1 >= 1.0 {
        // A machine that never fails pins the buffer at capacity.
        let mut distribution = vec![0.0; n + 1];
        distribution[n] = 1.0;
        return Ok(distribution);
    }
    if p2 >= 1.0 {
        // A perfect consumer drains every completed part on the next cycle,
        // so the buffer holds at most the part produced this cycle.
        let mut distribution = vec![0.0; n + 1];
        distribution[0] = 1.0 - p1;
        distribution[1] = p1;
        return Ok(distribution);
    }

    let ratio = flow_ratio(p1, p2);
    // Geometric tail: the occupancy-i probability scales with ratio^i.
    let mut powers = Vec::with_capacity(n);
    let mut power = 1.0;
    let mut tail_sum = 0.0;
    for _ in 0..n {
        power *= ratio;
        powers.push(power);
        tail_sum += power;
    }
    let empty = (1.0 - p2) / (1.0 - p2 + tail_sum);
    let mut distribution = Vec::with_capacity(n + 1);
    distribution.push(empty);
    distribution.extend(powers.iter().map(|r| r / (1.0 - p2) * empty));
    Ok(distribution)
}

/// Compute the probability the buffer is empty.
///
/// Derivable as entry 0 of [`compute_buffer_distribution`], but evaluated
/// through its own closed form since the aggregation engine calls this once
/// per stage per sweep.
pub fn compute_empty_probability(p1: f64, p2: f64, n: usize) -> Result<f64, LineError> {
    validate_probability(p1, "p1")?;
    validate_probability(p2, "p2")?;
    validate_capacity(n, "n")?;
    if p2 <= 0.0 && !nearly_equal(p1, p2) {
        return Err(LineError::DegenerateProbability { name: "p2" });
    }
    Ok(empty_probability_raw(p1, p2, n))
}

/// Compute the performance measures of an isolated two-machine line.
///
/// Production rate is what the downstream machine actually releases:
/// `PR = p2 (1 - Q(p1, p2, n))` with `Q` the empty-buffer probability.
/// Blocking and starvation are role-symmetric, `BL_1 = p1 Q(p2, p1, n)` and
/// `ST_2 = p2 Q(p1, p2, n)`, which yields the conservation identities
/// `PR + BL_1 = p1` and `PR + ST_2 = p2`.
///
/// Both probabilities must be strictly positive: each machine appears in a
/// flow-ratio denominator through the swapped `Q` call.
pub fn compute_two_machine_measures(
    p1: f64,
    p2: f64,
    n: usize,
) -> Result<TwoMachineMeasures, LineError> {
    validate_probability(p1, "p1")?;
    validate_probability(p2, "p2")?;
    validate_capacity(n, "n")?;
    if p1 <= 0.0 {
        return Err(LineError::DegenerateProbability { name: "p1" });
    }
    if p2 <= 0.0 {
        return Err(LineError::DegenerateProbability { name: "p2" });
    }

    let empty = empty_probability_raw(p1, p2, n);
    Ok(TwoMachineMeasures {
        production_rate: round_to(p2 * (1.0 - empty), 4),
        work_in_process: round_to(work_in_process_raw(p1, p2, n), 2),
        blocking: round_to(p1 * empty_probability_raw(p2, p1, n), 4),
        starvation: round_to(p2 * empty, 4),
    })
}
