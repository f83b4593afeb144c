//! Design generation errors.

use ms_core::DesignVariable;
use thiserror::Error;

pub type DesignResult<T> = Result<T, DesignError>;

/// Misconfiguration of a design. Always fatal: raised before any case is
/// written to disk.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DesignError {
    #[error("Invalid range for {variable}: min={min}, max={max} (need finite min < max)")]
    InvalidRange {
        variable: DesignVariable,
        min: f64,
        max: f64,
    },

    #[error("Invalid sample count: {count} (need at least one sample)")]
    InvalidCount { count: usize },

    #[error("Invalid fixed value for {variable}: {value}")]
    InvalidFixedValue { variable: DesignVariable, value: f64 },
}
