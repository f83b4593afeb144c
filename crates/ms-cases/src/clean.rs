//! Quota recovery: launch scripts and meshes are regenerated on demand, so
//! they can be dropped from case directories once a case has run.

use crate::layout::{CaseLayout, MESH_FILE};
use ms_core::CaseId;
use std::fs;
use tracing::warn;

/// Files removed from each case directory: exact names plus every file
/// whose stem is `launch_lethe` or `relaunch_lethe`.
const ARTIFACT_STEMS: [&str; 2] = ["launch_lethe", "relaunch_lethe"];

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CleanReport {
    pub cases: usize,
    pub files_removed: usize,
    pub errors: usize,
}

fn is_artifact(name: &str) -> bool {
    name == MESH_FILE
        || ARTIFACT_STEMS
            .iter()
            .any(|stem| name.strip_prefix(stem).is_some_and(|rest| rest.starts_with('.')))
}

/// Remove launch artifacts and meshes from the given cases. Missing
/// directories and files are not errors.
pub fn clean_case_artifacts(layout: &CaseLayout, ids: impl IntoIterator<Item = CaseId>) -> CleanReport {
    let mut report = CleanReport::default();

    for id in ids {
        let dir = layout.case_dir(id);
        let Ok(entries) = fs::read_dir(&dir) else {
            continue;
        };
        report.cases += 1;

        for entry in entries.filter_map(|e| e.ok()) {
            let name = entry.file_name();
            if !name.to_str().is_some_and(is_artifact) {
                continue;
            }
            match fs::remove_file(entry.path()) {
                Ok(()) => report.files_removed += 1,
                Err(err) => {
                    warn!(case = %id, file = ?name, error = %err, "could not remove artifact");
                    report.errors += 1;
                }
            }
        }
    }

    report
}
