//! Shared application service layer for mixsim.
//!
//! One entry point per command-line verb. Each service loads what it needs
//! from the campaign, calls into the pipeline crates and returns a report
//! for the front end to print.

pub mod audit_service;
pub mod campaign_service;
pub mod dispatch_service;
pub mod error;
pub mod harvest_service;
pub mod progress;
pub mod status_service;

// Re-export key types for convenience
pub use audit_service::{AuditSummary, audit_cases, audit_range, resubmit_needed};
pub use campaign_service::{
    CampaignSummary, GenerateReport, build_design, generate, load_campaign, render_mesh,
    summarize,
};
pub use dispatch_service::{dispatch_batch, scheduler_for};
pub use error::{AppError, AppResult};
pub use harvest_service::{clean_range, compare_dataset, harvest_range};
pub use progress::{ProgressEvent, Stage};
pub use status_service::{StatusSummary, campaign_status, lifecycle_status};
