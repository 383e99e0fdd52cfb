#![warn(missing_docs)]
//! Structural Machine Aggregation
//!
//! Collapses a group of machines described by production capacity, mean up
//! time and mean down time into one equivalent machine, for parallel or
//! consecutive-dependent arrangements. A closed-form reliability reduction;
//! no iteration, and independent of the Bernoulli line analysis.

mod aggregate;
mod units;

pub use aggregate::{
    AggregationMode, EquivalentMachine, StructuralConfig, StructuralError, aggregate_machines,
};
pub use units::{RateUnit, TimeUnit};
