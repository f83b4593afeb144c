//! Record of the design a campaign's case directories were generated from.

use crate::{CampaignError, CampaignResult};
use ms_design::ExperimentDesign;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const MANIFEST_FILE: &str = "campaign.json";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CampaignManifest {
    pub name: String,
    pub fingerprint: String,
    pub sample_count: usize,
    pub seed: u64,
    pub generated_at: String,
}

impl CampaignManifest {
    pub fn for_design(name: &str, design: &ExperimentDesign) -> Self {
        Self {
            name: name.to_string(),
            fingerprint: design.fingerprint(),
            sample_count: design.len(),
            seed: design.seed,
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn load(path: &Path) -> CampaignResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> CampaignResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        ms_core::atomic_write(path, json.as_bytes())?;
        Ok(())
    }

    /// Fail unless `design` is the design this manifest was written for.
    pub fn ensure_matches(&self, design: &ExperimentDesign) -> CampaignResult<()> {
        let fingerprint = design.fingerprint();
        if self.fingerprint != fingerprint {
            return Err(CampaignError::ManifestMismatch {
                what: format!(
                    "existing cases come from design {} but configuration yields {}",
                    short(&self.fingerprint),
                    short(&fingerprint)
                ),
            });
        }
        Ok(())
    }
}

/// Leading 12 bytes of a fingerprint for messages. A hand-edited manifest
/// may hold any text, so a prefix that splits a character falls back to
/// the whole string.
fn short(hash: &str) -> &str {
    hash.get(..12).unwrap_or(hash)
}
