//! Completion audit sweep and restart resubmission.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::RangeInclusive;

use ms_campaign::Campaign;
use ms_cases::{CaseLayout, CaseStatus, audit, latest_log};
use ms_core::CaseId;
use ms_dispatch::{BatchScheduler, LaunchSpec, ResubmitOutcome, WatermarkStore, resubmit};
use rayon::prelude::*;
use tracing::info;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, Default)]
pub struct AuditSummary {
    /// Audited cases in index order.
    pub statuses: Vec<(CaseId, CaseStatus)>,
    pub counts: BTreeMap<CaseStatus, usize>,
}

impl AuditSummary {
    fn from_statuses(statuses: Vec<(CaseId, CaseStatus)>) -> Self {
        let mut counts = BTreeMap::new();
        for (_, status) in &statuses {
            *counts.entry(*status).or_insert(0) += 1;
        }
        Self { statuses, counts }
    }

    pub fn count(&self, status: CaseStatus) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    pub fn with_status(&self, status: CaseStatus) -> Vec<CaseId> {
        self.statuses
            .iter()
            .filter(|(_, s)| *s == status)
            .map(|(id, _)| *id)
            .collect()
    }

    pub fn needs_resubmit(&self) -> Vec<CaseId> {
        self.with_status(CaseStatus::NeedsResubmit)
    }
}

/// Audit every case in `cases`. Cases are independent, so the sweep runs
/// in parallel.
///
/// Cases whose job is in `active_jobs` are still queued or running; they
/// are reported as `Submitted` or `Running` instead of being judged on a
/// partial log.
pub fn audit_cases(
    layout: &CaseLayout,
    cases: RangeInclusive<usize>,
    active_jobs: &BTreeSet<String>,
) -> AuditSummary {
    let statuses: Vec<(CaseId, CaseStatus)> = cases
        .into_par_iter()
        .map(|index| {
            let id = CaseId::new(index);
            let name = id.name();
            let status = if active_jobs.contains(&name) {
                match latest_log(&layout.case_dir(id), &name) {
                    Some(_) => CaseStatus::Running,
                    None => CaseStatus::Submitted,
                }
            } else {
                audit(layout, id)
            };
            (id, status)
        })
        .collect();
    AuditSummary::from_statuses(statuses)
}

/// Audit a range of the campaign. Without an explicit `last` the sweep
/// stops at the last dispatched case; nothing is audited before the first
/// dispatch. The scheduler queue is read once so in-flight jobs are not
/// mistaken for failures.
pub fn audit_range<S: BatchScheduler + ?Sized>(
    campaign: &Campaign,
    scheduler: &S,
    first: Option<usize>,
    last: Option<usize>,
) -> AppResult<AuditSummary> {
    let last = match last {
        Some(last) => Some(last),
        None => WatermarkStore::new(campaign.state_dir()).load()?.last,
    };
    let Some(last) = last else {
        info!("no case dispatched yet, nothing to audit");
        return Ok(AuditSummary::default());
    };
    let first = first.unwrap_or(0);
    let cases = checked_range(campaign, first, last)?;
    let active = scheduler.active_job_names()?;

    let summary = audit_cases(&CaseLayout::new(&campaign.root), cases, &active);
    info!(
        first,
        last,
        completed = summary.count(CaseStatus::Completed),
        needs_resubmit = summary.count(CaseStatus::NeedsResubmit),
        failed = summary.count(CaseStatus::Failed),
        in_flight = summary.count(CaseStatus::Submitted) + summary.count(CaseStatus::Running),
        "audit done"
    );
    Ok(summary)
}

/// Continue every `NeedsResubmit` case of `summary` that is no longer in
/// the queue, with the restart launch artifacts.
pub fn resubmit_needed<S: BatchScheduler + ?Sized>(
    campaign: &Campaign,
    scheduler: &S,
    summary: &AuditSummary,
) -> AppResult<ResubmitOutcome> {
    let active = scheduler.active_job_names()?;
    let dispatch = &campaign.config.dispatch;
    let relaunch = LaunchSpec {
        source_dir: &campaign.root,
        script: &dispatch.relaunch_script,
        artifacts: &dispatch.relaunch_artifacts,
    };
    let layout = CaseLayout::new(&campaign.root);

    let outcome = resubmit(scheduler, &layout, &summary.statuses, &relaunch, &active);
    info!(
        submitted = outcome.submitted.len(),
        still_active = outcome.skipped_active.len(),
        failed = outcome.failed.len(),
        "resubmission done"
    );
    Ok(outcome)
}

pub(crate) fn checked_range(
    campaign: &Campaign,
    first: usize,
    last: usize,
) -> AppResult<RangeInclusive<usize>> {
    let total = campaign.total_cases();
    if first > last {
        return Err(AppError::InvalidInput(format!(
            "first case {} is after last case {}",
            first, last
        )));
    }
    if last >= total {
        return Err(AppError::InvalidInput(format!(
            "last case {} is outside the campaign of {} cases",
            last, total
        )));
    }
    Ok(first..=last)
}
