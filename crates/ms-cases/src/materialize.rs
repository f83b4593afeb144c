//! Rendering solver inputs into case directories.

use crate::case::{Case, CaseStatus};
use crate::error::{CaseError, CaseResult};
use crate::layout::{CaseLayout, GEOMETRY_FILE, PARAMETER_FILE, TAG_FILE};
use crate::tag::format_tag;
use crate::template::{Template, TemplateValues, format_value};
use ms_core::{CaseId, DesignVariable, ParameterSet, atomic_write};
use std::path::Path;
use tracing::{debug, warn};

/// Mesh-size placeholders left in `mixer.geo` for the in-job render pass.
pub const DEFERRED_MESH_PLACEHOLDERS: [&str; 2] = ["min_mesh_length", "max_mesh_length"];

/// The two templates every case is rendered from.
#[derive(Debug, Clone)]
pub struct CaseTemplates {
    pub geometry: Template,
    pub parameters: Template,
}

impl CaseTemplates {
    pub fn load(geometry: &Path, parameters: &Path) -> CaseResult<Self> {
        Ok(Self {
            geometry: Template::from_file(geometry)?,
            parameters: Template::from_file(parameters)?,
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct MaterializeOptions {
    /// Cases above this Reynolds number start the solver from it and ramp
    /// up; cases at or below start directly at their own viscosity.
    pub initial_re: f64,
    pub overwrite: bool,
}

fn geometry_values(params: &ParameterSet) -> TemplateValues {
    DesignVariable::ALL
        .iter()
        .filter_map(|v| {
            v.geometry_placeholder()
                .map(|name| (name.to_string(), format_value(params.get(*v))))
        })
        .collect()
}

fn parameter_values(params: &ParameterSet, initial_re: f64) -> TemplateValues {
    let viscosity = params.viscosity_for(params.re);
    let initial_viscosity = if params.re > initial_re {
        params.viscosity_for(initial_re)
    } else {
        viscosity
    };

    let mut values = TemplateValues::new();
    values.insert("viscosity".to_string(), format_value(viscosity));
    values.insert(
        "initial_viscosity".to_string(),
        format_value(initial_viscosity),
    );
    values
}

/// Write the rendered geometry, parameter and tag files of one case.
///
/// Both templates are rendered before anything touches the disk, so a
/// render failure never leaves a half-populated directory behind.
pub fn materialize(
    params: &ParameterSet,
    id: CaseId,
    templates: &CaseTemplates,
    layout: &CaseLayout,
    options: &MaterializeOptions,
) -> CaseResult<Case> {
    let dir = layout.case_dir(id);
    if dir.exists() && !options.overwrite {
        return Err(CaseError::DirectoryExists { path: dir });
    }

    let geometry = templates
        .geometry
        .render(&geometry_values(params), &DEFERRED_MESH_PLACEHOLDERS)?;
    let parameters = templates
        .parameters
        .render(&parameter_values(params, options.initial_re), &[])?;
    let tag = format_tag(params);

    std::fs::create_dir_all(&dir).map_err(|e| CaseError::io(&dir, e))?;
    for (file, content) in [
        (GEOMETRY_FILE, geometry),
        (PARAMETER_FILE, parameters),
        (TAG_FILE, tag),
    ] {
        let path = dir.join(file);
        atomic_write(&path, content.as_bytes()).map_err(|e| CaseError::io(&path, e))?;
    }
    debug!(case = %id, dir = %dir.display(), "materialized case");

    Ok(Case {
        id,
        parameters: *params,
        dir,
        status: CaseStatus::Materialized,
        torque: None,
    })
}

/// Outcome of a bulk materialization pass.
#[derive(Debug, Default)]
pub struct MaterializeReport {
    pub written: usize,
    pub skipped: Vec<(CaseId, CaseError)>,
}

/// Materialize every case, skipping (and logging) the ones that fail.
///
/// `progress` receives `(done, total)` after each case.
pub fn materialize_all<I>(
    cases: I,
    templates: &CaseTemplates,
    layout: &CaseLayout,
    options: &MaterializeOptions,
    mut progress: Option<&mut dyn FnMut(usize, usize)>,
) -> MaterializeReport
where
    I: IntoIterator<Item = (CaseId, ParameterSet)>,
    I::IntoIter: ExactSizeIterator,
{
    let cases = cases.into_iter();
    let total = cases.len();
    let mut report = MaterializeReport::default();

    for (done, (id, params)) in cases.enumerate() {
        match materialize(&params, id, templates, layout, options) {
            Ok(_) => report.written += 1,
            Err(err) => {
                warn!(case = %id, error = %err, "skipping case");
                report.skipped.push((id, err));
            }
        }
        if let Some(cb) = progress.as_deref_mut() {
            cb(done + 1, total);
        }
    }

    report
}

/// Second render pass of `mixer.geo`: resolve the mesh-size placeholders.
pub fn render_mesh_stage(case_dir: &Path, min_mesh_length: f64, max_ratio: f64) -> CaseResult<()> {
    let path = case_dir.join(GEOMETRY_FILE);
    let template = Template::from_file(&path)?;

    let mut values = TemplateValues::new();
    values.insert("min_mesh_length".to_string(), format_value(min_mesh_length));
    values.insert(
        "max_mesh_length".to_string(),
        format_value(min_mesh_length * max_ratio),
    );
    let rendered = template.render(&values, &[])?;

    atomic_write(&path, rendered.as_bytes()).map_err(|e| CaseError::io(&path, e))
}
