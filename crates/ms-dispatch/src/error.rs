//! Dispatch errors.

use crate::scheduler::SchedulerError;
use ms_core::CaseId;
use std::path::PathBuf;

pub type DispatchResult<T> = Result<T, DispatchError>;

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The queue could not be counted; nothing was submitted.
    #[error("Queue query failed: {0}")]
    QueueQuery(#[source] SchedulerError),

    /// One case could not be submitted. It is retried on the next batch.
    #[error("Submission of {case} failed: {reason}")]
    Submission { case: CaseId, reason: String },

    #[error("Malformed watermark file {path}: {reason}")]
    Watermark { path: PathBuf, reason: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}
