//! ms-campaign: campaign configuration file format, validation and manifest.

pub mod manifest;
pub mod schema;
pub mod validate;

use std::path::{Path, PathBuf};

pub use manifest::CampaignManifest;
pub use schema::*;
pub use validate::{LATEST_VERSION, ValidationError, validate_config};

pub type CampaignResult<T> = Result<T, CampaignError>;

#[derive(thiserror::Error, Debug)]
pub enum CampaignError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Manifest mismatch: {what}")]
    ManifestMismatch { what: String },
}

pub fn load_yaml(path: &Path) -> CampaignResult<CampaignConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: CampaignConfig = serde_yaml::from_str(&content)?;
    validate_config(&config)?;
    Ok(config)
}

pub fn save_yaml(path: &Path, config: &CampaignConfig) -> CampaignResult<()> {
    validate_config(config)?;
    let content = serde_yaml::to_string(config)?;
    ms_core::atomic_write(path, content.as_bytes())?;
    Ok(())
}

/// A loaded configuration anchored at its campaign root directory.
///
/// Every relative path in the configuration resolves against `root`, which
/// is also where the `mixer_<i>` case directories live.
#[derive(Debug, Clone)]
pub struct Campaign {
    pub root: PathBuf,
    pub config: CampaignConfig,
}

impl Campaign {
    pub fn load(config_path: &Path) -> CampaignResult<Self> {
        let config = load_yaml(config_path)?;
        let root = match config_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        Ok(Self { root, config })
    }

    pub fn resolve(&self, relative: &Path) -> PathBuf {
        self.root.join(relative)
    }

    pub fn geometry_template(&self) -> PathBuf {
        self.resolve(&self.config.templates.geometry)
    }

    pub fn parameter_template(&self) -> PathBuf {
        self.resolve(&self.config.templates.parameters)
    }

    /// Directory holding the dispatch watermark files.
    pub fn state_dir(&self) -> PathBuf {
        self.resolve(&self.config.dispatch.state_dir)
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(manifest::MANIFEST_FILE)
    }

    pub fn total_cases(&self) -> usize {
        self.config.sample_count
    }
}
