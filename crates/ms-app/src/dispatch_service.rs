//! One incremental dispatch batch: load the watermark, submit, persist.

use ms_campaign::Campaign;
use ms_cases::CaseLayout;
use ms_dispatch::{
    BatchScheduler, DispatchOutcome, DispatchPlan, LaunchSpec, SlurmScheduler, WatermarkStore,
    dispatch_next_batch,
};

use crate::error::{AppError, AppResult};

/// Slurm scheduler for the configured user, or `$USER` when none is set.
pub fn scheduler_for(campaign: &Campaign) -> AppResult<SlurmScheduler> {
    let user = match &campaign.config.dispatch.user {
        Some(user) => user.clone(),
        None => std::env::var("USER").map_err(|_| {
            AppError::InvalidInput(
                "dispatch.user is not set and $USER is unavailable".to_string(),
            )
        })?,
    };
    Ok(SlurmScheduler::new(user))
}

/// Submit the next batch of cases and save the advanced watermark.
///
/// The watermark is written only after a batch that reached the scheduler;
/// an unreachable queue leaves it untouched.
pub fn dispatch_batch<S: BatchScheduler + ?Sized>(
    campaign: &Campaign,
    scheduler: &S,
    max_jobs: Option<usize>,
) -> AppResult<DispatchOutcome> {
    let dispatch = &campaign.config.dispatch;
    let max_concurrent_jobs = max_jobs.unwrap_or(dispatch.max_concurrent_jobs);
    if max_concurrent_jobs == 0 {
        return Err(AppError::InvalidInput(
            "max jobs must be at least 1".to_string(),
        ));
    }

    let store = WatermarkStore::new(campaign.state_dir());
    let state = store.load()?;
    let layout = CaseLayout::new(&campaign.root);
    let plan = DispatchPlan {
        layout: &layout,
        launch: LaunchSpec {
            source_dir: &campaign.root,
            script: &dispatch.launch_script,
            artifacts: &dispatch.launch_artifacts,
        },
        total_cases: campaign.total_cases(),
        max_concurrent_jobs,
    };

    let outcome = dispatch_next_batch(scheduler, &state, &plan)?;
    store.save(&outcome.state)?;
    Ok(outcome)
}
