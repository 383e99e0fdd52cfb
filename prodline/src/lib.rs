#![warn(missing_docs)]
//! # Prodline
//!
//! Production system engineering calculations for discrete-time,
//! discrete-material lines, without discrete-event simulation:
//! - **Two-Machine Exact Solution**: stationary buffer distribution,
//!   empty-buffer probability and performance measures of an isolated
//!   Bernoulli machine pair
//! - **Line Aggregation**: an M-machine line with M-1 finite buffers reduced
//!   to forward/backward equivalent machines by Gauss-Seidel fixed-point
//!   iteration, with an explicit tolerance and iteration cap
//! - **Line Performance Reports**: per-buffer WIP, per-machine blocking and
//!   starvation, production rate, total WIP and throughput, with a JSON
//!   emitter
//! - **Structural Aggregation**: parallel or consecutive-dependent machine
//!   groups collapsed into one equivalent machine, with explicit unit
//!   handling
//!
//! ## Quick Start
//!
//! ```
//! use prodline::compute_line_performance;
//!
//! let report = compute_line_performance(&[0.9, 0.8, 0.85], &[3, 3], 1.0)?;
//! println!("line produces {} parts per cycle", report.production_rate);
//! println!("{} parts resident in buffers", report.total_work_in_process);
//! # Ok::<(), prodline::LineError>(())
//! ```
//!
//! Every operation is a pure function: no state survives a call, and calls
//! never coordinate with each other.

// Re-export the Bernoulli line analysis
pub use prodline_bernoulli::{
    AggregationConfig, CONVERGENCE_TOLERANCE, LineAggregation, LineError, LinePerformance,
    MAX_AGGREGATION_ITERATIONS, PROBABILITY_EQUALITY_TOLERANCE, TwoMachineMeasures,
    aggregate_line, aggregate_line_with, compute_buffer_distribution, compute_empty_probability,
    compute_line_performance, compute_two_machine_measures, generate_json_report,
};

// Re-export the structural aggregator
pub use prodline_structural::{
    AggregationMode, EquivalentMachine, RateUnit, StructuralConfig, StructuralError, TimeUnit,
    aggregate_machines,
};
