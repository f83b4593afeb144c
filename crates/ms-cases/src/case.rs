//! Case lifecycle.

use ms_core::{CaseId, ParameterSet};
use std::fmt;
use std::path::PathBuf;

/// Where a case stands. Only `Completed` and `Failed` are terminal;
/// `NeedsResubmit` loops back to `Submitted` with restart artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CaseStatus {
    Materialized,
    Submitted,
    Running,
    Completed,
    Failed,
    NeedsResubmit,
}

impl CaseStatus {
    pub const ALL: [CaseStatus; 6] = [
        Self::Materialized,
        Self::Submitted,
        Self::Running,
        Self::Completed,
        Self::Failed,
        Self::NeedsResubmit,
    ];

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn can_transition_to(self, next: CaseStatus) -> bool {
        use CaseStatus::*;
        matches!(
            (self, next),
            (Materialized, Submitted)
                | (Submitted, Running)
                | (Submitted, Failed)
                | (Running, Completed)
                | (Running, NeedsResubmit)
                | (Running, Failed)
                | (NeedsResubmit, Submitted)
        )
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Materialized => "materialized",
            Self::Submitted => "submitted",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::NeedsResubmit => "needs_resubmit",
        }
    }
}

impl fmt::Display for CaseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

/// One simulation instance.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub id: CaseId,
    pub parameters: ParameterSet,
    pub dir: PathBuf,
    pub status: CaseStatus,
    pub torque: Option<f64>,
}
