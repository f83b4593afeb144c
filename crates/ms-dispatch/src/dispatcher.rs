//! Quota-bounded, resumable job submission.

use crate::error::{DispatchError, DispatchResult};
use crate::scheduler::{BatchScheduler, JobId};
use crate::watermark::DispatchState;
use ms_cases::{CaseLayout, CaseStatus};
use ms_core::CaseId;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Files copied into a case directory before its job script is submitted.
#[derive(Debug, Clone, Copy)]
pub struct LaunchSpec<'a> {
    /// Directory the artifacts are copied from (the campaign root).
    pub source_dir: &'a Path,
    /// Script handed to the scheduler, relative to the case directory.
    pub script: &'a str,
    pub artifacts: &'a [String],
}

#[derive(Debug, Clone, Copy)]
pub struct DispatchPlan<'a> {
    pub layout: &'a CaseLayout,
    pub launch: LaunchSpec<'a>,
    /// Number of cases in the campaign; the frontier never passes it.
    pub total_cases: usize,
    pub max_concurrent_jobs: usize,
}

#[derive(Debug)]
pub struct DispatchOutcome {
    /// Watermark to persist.
    pub state: DispatchState,
    pub submitted: Vec<CaseId>,
    pub failed: Vec<(CaseId, DispatchError)>,
    pub queue_count: usize,
    pub budget: usize,
}

/// Copy the launch artifacts into the case directory and submit its script
/// under the case name.
pub fn submit_case<S: BatchScheduler + ?Sized>(
    scheduler: &S,
    layout: &CaseLayout,
    id: CaseId,
    launch: &LaunchSpec<'_>,
) -> DispatchResult<JobId> {
    let submission = |reason: String| DispatchError::Submission { case: id, reason };

    let dir = layout.case_dir(id);
    if !dir.is_dir() {
        return Err(submission(format!(
            "case directory {} does not exist",
            dir.display()
        )));
    }

    for artifact in launch.artifacts {
        let from = launch.source_dir.join(artifact);
        fs::copy(&from, dir.join(artifact))
            .map_err(|e| submission(format!("copying {}: {}", from.display(), e)))?;
    }

    scheduler
        .submit(&dir.join(launch.script), &id.name())
        .map_err(|e| submission(e.to_string()))
}

/// Submit as many pending cases as the quota allows.
///
/// Cases whose earlier submission failed go first, then the cases after
/// the watermark, all in increasing index order. A failed submission is
/// logged and parked in the retry set; it never stops the batch. Only a
/// failed queue query is fatal, and then nothing is submitted.
pub fn dispatch_next_batch<S: BatchScheduler + ?Sized>(
    scheduler: &S,
    state: &DispatchState,
    plan: &DispatchPlan<'_>,
) -> DispatchResult<DispatchOutcome> {
    let queue_count = scheduler
        .count_jobs_for_user()
        .map_err(DispatchError::QueueQuery)?;
    let budget = plan.max_concurrent_jobs.saturating_sub(queue_count);
    info!(queue_count, budget, "dispatching batch");

    // Retry entries at or past the frontier are covered by the frontier scan.
    let frontier_start = state.next_frontier();
    let retries = state
        .retry
        .iter()
        .copied()
        .filter(|&i| i < frontier_start.min(plan.total_cases))
        .map(|i| (i, true));
    let frontier = (frontier_start..plan.total_cases).map(|i| (i, false));
    let candidates: Vec<(usize, bool)> = retries.chain(frontier).take(budget).collect();

    let mut next = state.clone();
    let mut frontier_first = None;
    let mut submitted = Vec::new();
    let mut failed = Vec::new();

    for (index, is_retry) in candidates {
        let id = CaseId::new(index);
        if !is_retry {
            if frontier_first.is_none() {
                frontier_first = Some(index);
            }
            next.last = Some(index);
        }

        match submit_case(scheduler, plan.layout, id, &plan.launch) {
            Ok(job_id) => {
                debug!(case = %id, job_id = %job_id, "submitted");
                next.retry.remove(&index);
                submitted.push(id);
            }
            Err(err) => {
                warn!(case = %id, error = %err, "submission failed, will retry");
                next.retry.insert(index);
                failed.push((id, err));
            }
        }
    }

    if frontier_first.is_some() {
        next.first = frontier_first;
    }
    info!(
        submitted = submitted.len(),
        failed = failed.len(),
        last = ?next.last,
        "batch done"
    );

    Ok(DispatchOutcome {
        state: next,
        submitted,
        failed,
        queue_count,
        budget,
    })
}

#[derive(Debug, Default)]
pub struct ResubmitOutcome {
    pub submitted: Vec<CaseId>,
    /// Still queued or running under the same name.
    pub skipped_active: Vec<CaseId>,
    pub failed: Vec<(CaseId, DispatchError)>,
}

/// Continue cases that ran out of wall time, using the restart launch
/// artifacts.
///
/// Only `NeedsResubmit` cases are considered, and those whose job is still
/// in the queue are left alone.
pub fn resubmit<S: BatchScheduler + ?Sized>(
    scheduler: &S,
    layout: &CaseLayout,
    cases: &[(CaseId, CaseStatus)],
    relaunch: &LaunchSpec<'_>,
    active_jobs: &BTreeSet<String>,
) -> ResubmitOutcome {
    let mut outcome = ResubmitOutcome::default();

    for &(id, status) in cases {
        if status != CaseStatus::NeedsResubmit {
            continue;
        }
        if active_jobs.contains(&id.name()) {
            outcome.skipped_active.push(id);
            continue;
        }
        match submit_case(scheduler, layout, id, relaunch) {
            Ok(job_id) => {
                info!(case = %id, job_id = %job_id, "resubmitted with restart");
                outcome.submitted.push(id);
            }
            Err(err) => {
                warn!(case = %id, error = %err, "resubmission failed");
                outcome.failed.push((id, err));
            }
        }
    }

    outcome
}
