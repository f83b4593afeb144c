//! ms-results: torque harvesting and the power-number dataset.

pub mod correlation;
pub mod dataset;
pub mod harvest;
pub mod torque;

pub use correlation::{
    CompareReport, Deviation, compare, correlation_for, unbaffled_power_number,
};
pub use dataset::{
    DatasetRow, FAILURE_MARKER, RowOutcome, default_dataset_name, feature_matrix, read_dataset,
    read_rows, read_rows_lenient, reconcile, write_dataset,
};
pub use harvest::{HarvestMode, HarvestReport, harvest, harvest_case};
pub use torque::{HarvestError, TORQUE_COLUMN, TorqueReading, power_number, read_last_torque};

use std::path::PathBuf;

pub type ResultsResult<T> = Result<T, ResultsError>;

#[derive(thiserror::Error, Debug)]
pub enum ResultsError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{path}:{line}: {reason}")]
    Format {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Invalid case range: first {first} is after last {last}")]
    InvalidRange { first: usize, last: usize },
}

impl ResultsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
