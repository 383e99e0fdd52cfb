//! Unit Handling
//!
//! The aggregation formulas work in seconds and parts per second. Callers
//! declare their units explicitly per call, and results are reported back in
//! the same units; there is no process-wide conversion table.

use serde::{Deserialize, Serialize};

/// Unit of the up-time and down-time inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TimeUnit {
    /// Seconds (the base unit)
    #[default]
    Seconds,
    /// Minutes
    Minutes,
    /// Hours
    Hours,
}

impl TimeUnit {
    /// Seconds in one of this unit.
    pub fn seconds(self) -> f64 {
        match self {
            TimeUnit::Seconds => 1.0,
            TimeUnit::Minutes => 60.0,
            TimeUnit::Hours => 3600.0,
        }
    }
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TimeUnit::Seconds => write!(f, "seconds"),
            TimeUnit::Minutes => write!(f, "minutes"),
            TimeUnit::Hours => write!(f, "hours"),
        }
    }
}

/// Unit of the machine-capacity inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum RateUnit {
    /// Parts per second (the base unit)
    #[default]
    PartsPerSecond,
    /// Parts per minute
    PartsPerMinute,
    /// Parts per hour
    PartsPerHour,
}

impl RateUnit {
    /// Parts per second in one of this unit.
    pub fn parts_per_second(self) -> f64 {
        match self {
            RateUnit::PartsPerSecond => 1.0,
            RateUnit::PartsPerMinute => 1.0 / 60.0,
            RateUnit::PartsPerHour => 1.0 / 3600.0,
        }
    }
}

impl std::fmt::Display for RateUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RateUnit::PartsPerSecond => write!(f, "parts/sec"),
            RateUnit::PartsPerMinute => write!(f, "parts/min"),
            RateUnit::PartsPerHour => write!(f, "parts/hour"),
        }
    }
}
