//! Equivalent-Machine Reduction
//!
//! Parallel machines share a stage and their capacities add; consecutive
//! dependent machines stop together, so the slowest capacity governs and the
//! group is up only when every member is.

use crate::units::{RateUnit, TimeUnit};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Arrangement of the machines being collapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AggregationMode {
    /// Machines work side by side on the same stage.
    #[default]
    Parallel,
    /// Machines operate in series without buffers and stop together.
    ConsecutiveDependent,
}

/// Input interpretation for [`aggregate_machines`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct StructuralConfig {
    /// Arrangement of the machines.
    pub mode: AggregationMode,
    /// Unit of the capacity entries.
    pub capacity_unit: RateUnit,
    /// Unit of the up-time entries.
    pub up_time_unit: TimeUnit,
    /// Unit of the down-time entries.
    pub down_time_unit: TimeUnit,
}

/// The equivalent single machine, in the units the inputs were declared in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquivalentMachine {
    /// Production capacity, rounded to 4 decimals.
    pub capacity: f64,
    /// Mean up time, rounded to 4 decimals.
    pub up_time: f64,
    /// Mean down time, rounded to 4 decimals.
    pub down_time: f64,
}

/// Errors from structural aggregation.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum StructuralError {
    /// At least one machine is required.
    #[error("At least one machine is required")]
    Empty,

    /// Paired sequences disagree about the number of machines.
    #[error("Parameter '{name}' must have length {expected}, got {actual}")]
    LengthMismatch {
        /// Offending parameter
        name: &'static str,
        /// Length implied by the capacity entries
        expected: usize,
        /// Length as supplied
        actual: usize,
    },

    /// Capacities and times must be strictly positive and finite.
    #[error("Parameter '{name}' must contain positive finite values, got {value}")]
    InvalidParameter {
        /// Offending parameter
        name: &'static str,
        /// First offending value
        value: f64,
    },
}

/// Collapse a machine group into one equivalent machine.
///
/// `capacity`, `up_time` and `down_time` describe one machine per index, in
/// the units declared by `config`; the result comes back in those same
/// units, rounded to 4 decimal places.
pub fn aggregate_machines(
    capacity: &[f64],
    up_time: &[f64],
    down_time: &[f64],
    config: &StructuralConfig,
) -> Result<EquivalentMachine, StructuralError> {
    if capacity.is_empty() {
        return Err(StructuralError::Empty);
    }
    validate_lengths(capacity.len(), up_time.len(), "up_time")?;
    validate_lengths(capacity.len(), down_time.len(), "down_time")?;
    validate_positive(capacity, "capacity")?;
    validate_positive(up_time, "up_time")?;
    validate_positive(down_time, "down_time")?;

    // Work in base units (seconds, parts per second).
    let rate_factor = config.capacity_unit.parts_per_second();
    let up_factor = config.up_time_unit.seconds();
    let down_factor = config.down_time_unit.seconds();
    let c: Vec<f64> = capacity.iter().map(|v| v * rate_factor).collect();
    let up: Vec<f64> = up_time.iter().map(|v| v * up_factor).collect();
    let down: Vec<f64> = down_time.iter().map(|v| v * down_factor).collect();

    let (c_agg, up_agg, down_agg) = match config.mode {
        AggregationMode::Parallel => aggregate_parallel(&c, &up, &down),
        AggregationMode::ConsecutiveDependent => aggregate_consecutive(&c, &up, &down),
    };

    // Report back in the caller's units.
    Ok(EquivalentMachine {
        capacity: round_to(c_agg / rate_factor, 4),
        up_time: round_to(up_agg / up_factor, 4),
        down_time: round_to(down_agg / down_factor, 4),
    })
}

fn validate_lengths(
    expected: usize,
    actual: usize,
    name: &'static str,
) -> Result<(), StructuralError> {
    if actual != expected {
        return Err(StructuralError::LengthMismatch {
            name,
            expected,
            actual,
        });
    }
    Ok(())
}

fn validate_positive(values: &[f64], name: &'static str) -> Result<(), StructuralError> {
    for &value in values {
        if !(value.is_finite() && value > 0.0) {
            return Err(StructuralError::InvalidParameter { name, value });
        }
    }
    Ok(())
}

/// Parallel reduction: capacities add, and the failure/repair frequencies mix
/// weighted by how much flow each machine carries.
fn aggregate_parallel(c: &[f64], up: &[f64], down: &[f64]) -> (f64, f64, f64) {
    let count = c.len();
    let mut up_sum = 0.0;
    let mut down_sum = 0.0;
    let mut denominator = 0.0;

    for i in 0..count {
        let others: f64 = (0..count)
            .filter(|&j| j != i)
            .map(|j| 1.0 / up[j] + 1.0 / down[j])
            .product();
        up_sum += c[i] / down[i] * others;
        down_sum += c[i] / up[i] * others;
        denominator += 1.0 / (up[i] * down[i]) * others;
    }

    let capacity: f64 = c.iter().sum();
    let coefficient = count as f64 / capacity / denominator;
    (capacity, up_sum * coefficient, down_sum * coefficient)
}

/// Consecutive-dependent reduction: the group is up only when every machine
/// is, and the slowest machine caps the flow.
fn aggregate_consecutive(c: &[f64], up: &[f64], down: &[f64]) -> (f64, f64, f64) {
    let availability: f64 = up.iter().zip(down).map(|(u, d)| u / (u + d)).product();
    let mean_cycle = up
        .iter()
        .zip(down)
        .map(|(u, d)| u + d)
        .sum::<f64>()
        / c.len() as f64;
    let capacity = c.iter().copied().fold(f64::INFINITY, f64::min);
    (
        capacity,
        mean_cycle * availability,
        mean_cycle * (1.0 - availability),
    )
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
