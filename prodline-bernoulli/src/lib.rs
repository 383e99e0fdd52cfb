#![warn(missing_docs)]
//! Bernoulli Line Analysis
//!
//! Steady-state performance of discrete-time, discrete-material production
//! lines whose machines follow a Bernoulli reliability model (each machine is
//! available in a given cycle with fixed probability `p`, independently
//! across cycles):
//! - Exact two-machine solution: stationary buffer-occupancy distribution,
//!   empty-buffer probability, performance measures
//! - Recursive aggregation of an M-machine line into forward/backward
//!   equivalent machines, solved as a Gauss-Seidel fixed point over
//!   two-machine subsystems
//! - Whole-line reports: production rate, per-buffer WIP, blocking,
//!   starvation, throughput
//!
//! Everything is a pure function over slices; no state persists across calls.

mod aggregation;
mod performance;
mod two_machine;

pub use aggregation::{AggregationConfig, LineAggregation, aggregate_line, aggregate_line_with};
pub use performance::{LinePerformance, compute_line_performance, generate_json_report};
pub use two_machine::{
    TwoMachineMeasures, compute_buffer_distribution, compute_empty_probability,
    compute_two_machine_measures,
};

use thiserror::Error;

/// Convergence tolerance for the aggregation fixed point
pub const CONVERGENCE_TOLERANCE: f64 = 1e-6;

/// Safety cap on aggregation iterations; well-conditioned lines converge in
/// tens of sweeps, but probabilities at the boundary can stall the fixed point
pub const MAX_AGGREGATION_ITERATIONS: usize = 10_000;

/// Tolerance below which two machine probabilities take the equal-probability
/// closed forms instead of the flow-ratio ones (which degenerate to 0/0)
pub const PROBABILITY_EQUALITY_TOLERANCE: f64 = 1e-9;

/// Errors from Bernoulli line computations
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum LineError {
    /// A probability parameter fell outside `[0, 1]`.
    #[error("Parameter '{name}' must be between 0 and 1, got {value}")]
    InvalidProbability {
        /// Offending parameter
        name: &'static str,
        /// Value as supplied
        value: f64,
    },

    /// A buffer must hold at least one part.
    #[error("Buffer capacity '{name}' must be positive")]
    InvalidCapacity {
        /// Offending parameter
        name: &'static str,
    },

    /// Throughput is production rate per unit of cycle time.
    #[error("Cycle time must be positive and finite, got {value}")]
    InvalidCycleTime {
        /// Value as supplied
        value: f64,
    },

    /// A line is two or more machines with a buffer between each pair.
    #[error("A line needs at least 2 machines, got {count}")]
    NotEnoughMachines {
        /// Number of machines supplied
        count: usize,
    },

    /// Paired sequences disagree about the number of stages.
    #[error("Parameter '{name}' must have length {expected}, got {actual}")]
    LengthMismatch {
        /// Offending parameter
        name: &'static str,
        /// Length implied by the machine count
        expected: usize,
        /// Length as supplied
        actual: usize,
    },

    /// A machine probability of exactly zero leaves the flow ratio undefined.
    #[error("Machine probability '{name}' of exactly 0 makes the flow ratio undefined")]
    DegenerateProbability {
        /// Offending parameter
        name: &'static str,
    },

    /// The aggregation fixed point did not settle within the iteration cap.
    #[error("Aggregation did not converge within {iterations} iterations (residual {residual:e})")]
    NotConverged {
        /// Iterations performed before giving up
        iterations: usize,
        /// Largest probability change in the final sweep pair
        residual: f64,
    },
}

/// Round to a fixed number of decimal places, for the reporting boundary only.
pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants() {
        assert!((CONVERGENCE_TOLERANCE - 1e-6).abs() < f64::EPSILON);
        assert_eq!(MAX_AGGREGATION_ITERATIONS, 10_000);
        assert!(PROBABILITY_EQUALITY_TOLERANCE < CONVERGENCE_TOLERANCE);
    }

    #[test]
    fn test_round_to() {
        assert!((round_to(0.69371874, 4) - 0.6937).abs() < f64::EPSILON);
        assert!((round_to(3.926627, 2) - 3.93).abs() < f64::EPSILON);
        assert!((round_to(1.0, 4) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_error_messages_name_the_parameter() {
        let err = LineError::InvalidProbability {
            name: "p1",
            value: 1.5,
        };
        assert!(err.to_string().contains("'p1'"));

        let err = LineError::NotConverged {
            iterations: 10_000,
            residual: 0.25,
        };
        assert!(err.to_string().contains("10000 iterations"));
    }
}
