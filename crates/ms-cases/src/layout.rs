//! File names inside a campaign and its case directories.

use ms_core::CaseId;
use std::path::{Path, PathBuf};

pub const GEOMETRY_FILE: &str = "mixer.geo";
pub const PARAMETER_FILE: &str = "mixer.prm";
pub const TAG_FILE: &str = "mixer.txt";
pub const MESH_FILE: &str = "mixer.msh";
/// Torque time series written by the solver while it runs.
pub const TORQUE_FILE: &str = "torque.00.dat";

/// Maps case ids onto directories under the campaign root.
#[derive(Debug, Clone)]
pub struct CaseLayout {
    root: PathBuf,
}

impl CaseLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn case_dir(&self, id: CaseId) -> PathBuf {
        self.root.join(id.name())
    }

    pub fn tag_path(&self, id: CaseId) -> PathBuf {
        self.case_dir(id).join(TAG_FILE)
    }

    pub fn torque_path(&self, id: CaseId) -> PathBuf {
        self.case_dir(id).join(TORQUE_FILE)
    }

    pub fn has_case(&self, id: CaseId) -> bool {
        self.tag_path(id).exists()
    }
}
