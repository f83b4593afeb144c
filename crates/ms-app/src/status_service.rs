//! Lifecycle view of a whole campaign, combining the watermark, the
//! scheduler queue and the audit.

use std::collections::{BTreeMap, BTreeSet};

use ms_campaign::Campaign;
use ms_cases::{CaseLayout, CaseStatus, infer_status, latest_log};
use ms_core::CaseId;
use ms_dispatch::{BatchScheduler, DispatchState, WatermarkStore};
use rayon::prelude::*;

use crate::error::AppResult;

#[derive(Debug, Clone)]
pub struct StatusSummary {
    pub state: DispatchState,
    pub total: usize,
    pub counts: BTreeMap<CaseStatus, usize>,
}

impl StatusSummary {
    pub fn count(&self, status: CaseStatus) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }
}

/// Status of one case.
///
/// Never-submitted cases are `Materialized`. A case whose job is still
/// queued is `Submitted` until the scheduler has written a log, `Running`
/// afterwards. Anything else is decided by the completion audit.
pub fn lifecycle_status(
    layout: &CaseLayout,
    id: CaseId,
    state: &DispatchState,
    active_jobs: &BTreeSet<String>,
) -> CaseStatus {
    if !state.is_submitted(id.index()) {
        return CaseStatus::Materialized;
    }
    let name = id.name();
    let dir = layout.case_dir(id);
    if active_jobs.contains(&name) {
        return match latest_log(&dir, &name) {
            Some(_) => CaseStatus::Running,
            None => CaseStatus::Submitted,
        };
    }
    infer_status(&dir)
}

pub fn campaign_status<S: BatchScheduler + ?Sized>(
    campaign: &Campaign,
    scheduler: &S,
) -> AppResult<StatusSummary> {
    let state = WatermarkStore::new(campaign.state_dir()).load()?;
    let active = scheduler.active_job_names()?;
    let layout = CaseLayout::new(&campaign.root);
    let total = campaign.total_cases();

    let counts = (0..total)
        .into_par_iter()
        .map(|index| lifecycle_status(&layout, CaseId::new(index), &state, &active))
        .fold(BTreeMap::new, |mut counts, status| {
            *counts.entry(status).or_insert(0usize) += 1;
            counts
        })
        .reduce(BTreeMap::new, |mut a, b| {
            for (status, n) in b {
                *a.entry(status).or_insert(0) += n;
            }
            a
        });

    Ok(StatusSummary {
        state,
        total,
        counts,
    })
}
