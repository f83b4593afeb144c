//! Campaign loading, validation, and case generation.

use std::path::Path;

use ms_campaign::{Campaign, CampaignManifest};
use ms_cases::{
    CaseError, CaseLayout, CaseTemplates, MaterializeOptions, materialize_all, render_mesh_stage,
};
use ms_core::{CaseId, DesignVariable};
use ms_design::{ExperimentDesign, VariableRange, VariableSpec, design_fingerprint};
use tracing::info;

use crate::error::AppResult;
use crate::progress::{ProgressEvent, Reporter, Stage};

/// Summary of a campaign for display.
#[derive(Debug, Clone)]
pub struct CampaignSummary {
    pub name: String,
    pub sample_count: usize,
    pub seed: u64,
    pub sampled: Vec<(DesignVariable, VariableRange)>,
    pub fixed: Vec<(DesignVariable, f64)>,
    pub fingerprint: String,
}

#[derive(Debug)]
pub struct GenerateReport {
    pub fingerprint: String,
    pub total: usize,
    pub written: usize,
    /// Directories left as they were because they already existed.
    pub already_present: usize,
    pub skipped: Vec<(CaseId, CaseError)>,
}

/// Load and validate a campaign configuration.
pub fn load_campaign(path: &Path) -> AppResult<Campaign> {
    Ok(Campaign::load(path)?)
}

pub fn summarize(campaign: &Campaign) -> CampaignSummary {
    let config = &campaign.config;
    let space = config.ranges.design_space();

    let mut sampled = Vec::new();
    let mut fixed = Vec::new();
    for (variable, spec) in DesignVariable::ALL.into_iter().zip(space.variables) {
        match spec {
            VariableSpec::Sampled(range) => sampled.push((variable, range)),
            VariableSpec::Fixed(value) => fixed.push((variable, value)),
        }
    }

    CampaignSummary {
        name: config.name.clone(),
        sample_count: config.sample_count,
        seed: config.seed,
        sampled,
        fixed,
        fingerprint: design_fingerprint(
            &space.variables.map(|s| s.bounds()),
            config.sample_count,
            config.seed,
        ),
    }
}

pub fn build_design(campaign: &Campaign) -> AppResult<ExperimentDesign> {
    let config = &campaign.config;
    Ok(config
        .ranges
        .design_space()
        .generate(config.sample_count, config.seed)?)
}

/// Sample the design and render every case directory, then record the
/// manifest.
///
/// Without `overwrite` generation resumes: existing case directories are
/// kept, and an existing manifest must describe the same design.
pub fn generate(
    campaign: &Campaign,
    overwrite: bool,
    progress: Option<&mut dyn FnMut(ProgressEvent)>,
) -> AppResult<GenerateReport> {
    let design = build_design(campaign)?;
    let manifest_path = campaign.manifest_path();
    if !overwrite && manifest_path.exists() {
        CampaignManifest::load(&manifest_path)?.ensure_matches(&design)?;
    }

    let templates =
        CaseTemplates::load(&campaign.geometry_template(), &campaign.parameter_template())?;
    let layout = CaseLayout::new(&campaign.root);
    let options = MaterializeOptions {
        initial_re: campaign.config.initial_re,
        overwrite,
    };

    let pending: Vec<_> = design
        .iter_parameters()
        .map(|(index, params)| (CaseId::new(index), params))
        .filter(|(id, _)| overwrite || !layout.has_case(*id))
        .collect();
    let already_present = design.len() - pending.len();
    info!(
        total = design.len(),
        pending = pending.len(),
        "materializing cases"
    );

    let mut reporter = Reporter::new(Stage::Materializing, progress);
    let mut tick = |done: usize, total: usize| reporter.tick(done, total);
    let report = materialize_all(pending, &templates, &layout, &options, Some(&mut tick));

    let manifest = CampaignManifest::for_design(&campaign.config.name, &design);
    manifest.save(&manifest_path)?;

    Ok(GenerateReport {
        fingerprint: manifest.fingerprint,
        total: design.len(),
        written: report.written,
        already_present,
        skipped: report.skipped,
    })
}

/// Resolve the deferred mesh placeholders in one case's geometry file.
pub fn render_mesh(case_dir: &Path, min_mesh_length: f64, max_ratio: f64) -> AppResult<()> {
    render_mesh_stage(case_dir, min_mesh_length, max_ratio)?;
    info!(dir = %case_dir.display(), min_mesh_length, max_ratio, "mesh sizes rendered");
    Ok(())
}
