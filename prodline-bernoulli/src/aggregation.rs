//! Line Aggregation Engine
//!
//! Collapses an M-machine Bernoulli line with M-1 finite buffers into
//! forward and backward equivalent machines, solved as a fixed point over
//! two-machine subsystems. Each iteration runs one backward sweep then one
//! forward sweep, and each sweep reuses the values already updated within the
//! same iteration (Gauss-Seidel ordering, which the convergence rate depends
//! on). This is the only iterative construct in the crate.

use crate::two_machine::empty_probability_raw;
use crate::{CONVERGENCE_TOLERANCE, LineError, MAX_AGGREGATION_ITERATIONS, round_to};
use serde::{Deserialize, Serialize};

/// Controls for the aggregation fixed point
#[derive(Debug, Clone)]
pub struct AggregationConfig {
    /// Convergence tolerance on the largest sweep-to-sweep probability change
    pub tolerance: f64,
    /// Iteration cap; exceeding it fails with [`LineError::NotConverged`]
    pub max_iterations: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            tolerance: CONVERGENCE_TOLERANCE,
            max_iterations: MAX_AGGREGATION_ITERATIONS,
        }
    }
}

/// Converged equivalent probabilities of an aggregated line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineAggregation {
    /// `forward[i]`: machines `0..=i` collapsed into one, as seen by machine
    /// `i + 1`; `forward[0]` is always the first machine's own probability.
    pub forward: Vec<f64>,
    /// `backward[i]`: machines `i..` collapsed into one, as seen by machine
    /// `i - 1`; the last entry is always the last machine's own probability.
    pub backward: Vec<f64>,
    /// Iterations until the residual dropped below tolerance.
    pub iterations: usize,
}

/// Aggregate a line with the default tolerance and iteration cap.
///
/// `p` holds one availability probability per machine (at least two, each in
/// `(0, 1]`), `n` one buffer capacity per adjacent pair.
pub fn aggregate_line(p: &[f64], n: &[usize]) -> Result<LineAggregation, LineError> {
    aggregate_line_with(p, n, &AggregationConfig::default())
}

/// Aggregate a line under explicit iteration controls.
///
/// The returned probabilities are rounded to 4 decimal places; the iteration
/// itself runs in full precision.
pub fn aggregate_line_with(
    p: &[f64],
    n: &[usize],
    config: &AggregationConfig,
) -> Result<LineAggregation, LineError> {
    validate_line(p, n)?;

    let mut forward = p.to_vec();
    let mut backward = p.to_vec();
    let iterations = iterate_to_fixed_point(p, n, &mut forward, &mut backward, config)?;

    for value in forward.iter_mut().chain(backward.iter_mut()) {
        *value = round_to(*value, 4);
    }
    Ok(LineAggregation {
        forward,
        backward,
        iterations,
    })
}

pub(crate) fn validate_line(p: &[f64], n: &[usize]) -> Result<(), LineError> {
    if p.len() < 2 {
        return Err(LineError::NotEnoughMachines { count: p.len() });
    }
    if n.len() != p.len() - 1 {
        return Err(LineError::LengthMismatch {
            name: "n",
            expected: p.len() - 1,
            actual: n.len(),
        });
    }
    for &value in p {
        if !(0.0..=1.0).contains(&value) {
            return Err(LineError::InvalidProbability { name: "p", value });
        }
        if value == 0.0 {
            return Err(LineError::DegenerateProbability { name: "p" });
        }
    }
    if n.iter().any(|&capacity| capacity == 0) {
        return Err(LineError::InvalidCapacity { name: "n" });
    }
    Ok(())
}

/// Run sweep pairs in place until the residual drops below tolerance.
///
/// `forward[0]` and `backward[M-1]` are boundary conditions and are never
/// written. Returns the number of iterations taken.
fn iterate_to_fixed_point(
    p: &[f64],
    n: &[usize],
    forward: &mut [f64],
    backward: &mut [f64],
    config: &AggregationConfig,
) -> Result<usize, LineError> {
    let machines = p.len();
    let mut residual = f64::INFINITY;

    for iteration in 1..=config.max_iterations {
        residual = 0.0;

        // Backward sweep: stage i sees the i+1 value updated moments ago.
        for i in (0..machines - 1).rev() {
            let next = p[i] * (1.0 - empty_probability_raw(backward[i + 1], forward[i], n[i]));
            residual = residual.max((next - backward[i]).abs());
            backward[i] = next;
        }
        // Forward sweep: stage i sees this sweep's i-1 value and this
        // iteration's backward values.
        for i in 1..machines {
            let next = p[i] * (1.0 - empty_probability_raw(forward[i - 1], backward[i], n[i - 1]));
            residual = residual.max((next - forward[i]).abs());
            forward[i] = next;
        }

        tracing::trace!(iteration, residual, "aggregation sweep");
        if residual < config.tolerance {
            tracing::debug!(iterations = iteration, "line aggregation converged");
            return Ok(iteration);
        }
    }

    Err(LineError::NotConverged {
        iterations: config.max_iterations,
        residual,
    })
}
