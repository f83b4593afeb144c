//! In-memory scheduler for exercising dispatch logic without a cluster.

use crate::scheduler::{BatchScheduler, JobId, SchedulerError};
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Reports a fixed queue size and records every submission.
#[derive(Debug, Default)]
pub struct MockScheduler {
    queue_count: usize,
    unreachable: bool,
    rejected: BTreeSet<String>,
    active: BTreeSet<String>,
    submissions: RefCell<Vec<(PathBuf, String)>>,
}

impl MockScheduler {
    pub fn with_queue_count(queue_count: usize) -> Self {
        Self {
            queue_count,
            ..Self::default()
        }
    }

    /// Every query fails.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    /// Submissions under `job_name` are refused.
    pub fn rejecting(mut self, job_name: impl Into<String>) -> Self {
        self.rejected.insert(job_name.into());
        self
    }

    /// `job_name` shows up as queued or running.
    pub fn with_active(mut self, job_name: impl Into<String>) -> Self {
        self.active.insert(job_name.into());
        self
    }

    pub fn submissions(&self) -> Vec<(PathBuf, String)> {
        self.submissions.borrow().clone()
    }

    pub fn submitted_names(&self) -> Vec<String> {
        self.submissions
            .borrow()
            .iter()
            .map(|(_, name)| name.clone())
            .collect()
    }

    fn check_reachable(&self) -> Result<(), SchedulerError> {
        if self.unreachable {
            return Err(SchedulerError::Failed {
                command: "squeue".to_string(),
                status: "exit status: 1".to_string(),
                stderr: "slurm_load_jobs error: Unable to contact slurm controller".to_string(),
            });
        }
        Ok(())
    }
}

impl BatchScheduler for MockScheduler {
    fn count_jobs_for_user(&self) -> Result<usize, SchedulerError> {
        self.check_reachable()?;
        Ok(self.queue_count)
    }

    fn submit(&self, script_path: &Path, job_name: &str) -> Result<JobId, SchedulerError> {
        self.check_reachable()?;
        if self.rejected.contains(job_name) {
            return Err(SchedulerError::Rejected(format!("{job_name} refused")));
        }
        let mut submissions = self.submissions.borrow_mut();
        submissions.push((script_path.to_path_buf(), job_name.to_string()));
        Ok((1000 + submissions.len()).to_string())
    }

    fn active_job_names(&self) -> Result<BTreeSet<String>, SchedulerError> {
        self.check_reachable()?;
        Ok(self.active.clone())
    }
}
