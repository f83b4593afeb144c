//! ms-cases: per-case working directories.
//!
//! Everything the pipeline knows about a case lives in its `mixer_<index>`
//! directory: the rendered solver inputs, the tag file, and whatever the
//! scheduler and solver write there. This crate owns that layout:
//! - rendering templates into a fresh case directory (materialization)
//! - reading the tag file back
//! - inferring a case's status from the files present (audit)
//! - removing launch artifacts to recover quota

pub mod audit;
pub mod case;
pub mod clean;
pub mod error;
pub mod layout;
pub mod materialize;
pub mod tag;
pub mod template;

pub use audit::{COMPLETION_BANNER, LogFile, audit, infer_status, latest_log};
pub use case::{Case, CaseStatus};
pub use clean::{CleanReport, clean_case_artifacts};
pub use error::{CaseError, CaseResult};
pub use layout::CaseLayout;
pub use materialize::{
    CaseTemplates, MaterializeOptions, MaterializeReport, materialize, materialize_all,
    render_mesh_stage,
};
pub use tag::{format_tag, parse_tag, read_tag_file};
pub use template::{Template, TemplateValues};
