//! Harvesting, quota cleanup and correlation comparison.

use std::path::{Path, PathBuf};

use ms_campaign::Campaign;
use ms_cases::{CaseLayout, CleanReport, clean_case_artifacts};
use ms_core::CaseId;
use ms_results::{
    CompareReport, HarvestMode, HarvestReport, compare, default_dataset_name, harvest,
    read_dataset,
};
use tracing::info;

use crate::audit_service::checked_range;
use crate::error::AppResult;
use crate::progress::{ProgressEvent, Reporter, Stage};

/// Harvest cases `first..=last` into `output`, or into
/// `mixer_database_<first>-<last>.txt` in the campaign root.
pub fn harvest_range(
    campaign: &Campaign,
    first: usize,
    last: usize,
    output: Option<&Path>,
    mode: HarvestMode,
    progress: Option<&mut dyn FnMut(ProgressEvent)>,
) -> AppResult<HarvestReport> {
    let cases = checked_range(campaign, first, last)?;
    let dataset: PathBuf = match output {
        Some(path) => path.to_path_buf(),
        None => campaign.resolve(Path::new(&default_dataset_name(first, last))),
    };
    let layout = CaseLayout::new(&campaign.root);

    let mut reporter = Reporter::new(Stage::Harvesting, progress);
    let mut tick = |done: usize, total: usize| reporter.tick(done, total);
    Ok(harvest(&layout, cases, &dataset, mode, Some(&mut tick))?)
}

/// Drop launch artifacts and meshes from cases `first..=last`.
pub fn clean_range(campaign: &Campaign, first: usize, last: usize) -> AppResult<CleanReport> {
    let cases = checked_range(campaign, first, last)?;
    let layout = CaseLayout::new(&campaign.root);
    let report = clean_case_artifacts(&layout, cases.map(CaseId::new));
    info!(
        cases = report.cases,
        files_removed = report.files_removed,
        errors = report.errors,
        "cleanup done"
    );
    Ok(report)
}

pub fn compare_dataset(path: &Path) -> AppResult<CompareReport> {
    let rows = read_dataset(path)?;
    Ok(compare(&rows))
}
