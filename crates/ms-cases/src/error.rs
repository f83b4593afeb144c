//! Error types for case materialization and inspection.

use std::path::PathBuf;

pub type CaseResult<T> = Result<T, CaseError>;

/// Failure confined to a single case. Bulk operations log these and move on
/// to the next case.
#[derive(Debug, thiserror::Error)]
pub enum CaseError {
    #[error("Template {template} has unresolved placeholders: {}", .placeholders.join(", "))]
    TemplateRender {
        template: String,
        placeholders: Vec<String>,
    },

    #[error("Case directory already exists: {path}")]
    DirectoryExists { path: PathBuf },

    #[error("Malformed tag file {path}: {reason}")]
    TagFormat { path: PathBuf, reason: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl CaseError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
