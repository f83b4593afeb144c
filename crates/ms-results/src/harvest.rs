//! Collect the power number of a range of cases into a dataset file.

use crate::dataset::{DatasetRow, RowOutcome, read_rows_lenient, reconcile, write_dataset};
use crate::torque::{HarvestError, power_number, read_last_torque};
use crate::{ResultsError, ResultsResult};
use ms_cases::{CaseLayout, read_tag_file};
use ms_core::CaseId;
use std::fs::OpenOptions;
use std::io::Write;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HarvestMode {
    /// Add rows to the end of the file; earlier rows for the same cases stay.
    #[default]
    Append,
    /// Rewrite the file keeping one row per case, the newest.
    Reconcile,
}

#[derive(Debug)]
pub struct HarvestReport {
    pub path: PathBuf,
    pub rows: Vec<DatasetRow>,
    pub succeeded: usize,
    pub failed: usize,
    /// Unreadable lines of the old dataset left out of a reconcile rewrite.
    pub dropped_lines: usize,
}

/// Dataset row for one case. Never fails: any problem yields the failure
/// marker and a warning.
pub fn harvest_case(layout: &CaseLayout, id: CaseId) -> DatasetRow {
    let parameters = match read_tag_file(&layout.tag_path(id)) {
        Ok((_, params)) => params,
        Err(err) => {
            let err = HarvestError::Tag(err.to_string());
            warn!(case = %id, error = %err, "no parameters, writing bare failure row");
            return DatasetRow {
                case: id,
                parameters: None,
                outcome: RowOutcome::Failed,
            };
        }
    };

    let reading = read_last_torque(&layout.torque_path(id))
        .and_then(|torque| power_number(torque, &parameters));
    let outcome = match reading {
        Ok(reading) => {
            debug!(case = %id, torque = reading.torque, np = reading.power_number, "harvested");
            RowOutcome::PowerNumber(reading.power_number)
        }
        Err(err) => {
            warn!(case = %id, error = %err, "simulation failed");
            RowOutcome::Failed
        }
    };

    DatasetRow {
        case: id,
        parameters: Some(parameters),
        outcome,
    }
}

/// Harvest `cases` in increasing order into `dataset`.
pub fn harvest(
    layout: &CaseLayout,
    cases: RangeInclusive<usize>,
    dataset: &Path,
    mode: HarvestMode,
    mut progress: Option<&mut dyn FnMut(usize, usize)>,
) -> ResultsResult<HarvestReport> {
    let (first, last) = (*cases.start(), *cases.end());
    if first > last {
        return Err(ResultsError::InvalidRange { first, last });
    }
    let total = last - first + 1;

    let mut rows = Vec::with_capacity(total);
    for (done, index) in cases.enumerate() {
        rows.push(harvest_case(layout, CaseId::new(index)));
        if let Some(callback) = progress.as_mut() {
            callback(done + 1, total);
        }
    }

    let mut dropped_lines = 0;
    match mode {
        HarvestMode::Append => append_rows(dataset, &rows)?,
        HarvestMode::Reconcile => {
            let existing = if dataset.exists() {
                let (existing, dropped) = read_rows_lenient(dataset)?;
                dropped_lines = dropped;
                existing
            } else {
                Vec::new()
            };
            let merged = reconcile(existing.into_iter().chain(rows.iter().cloned()));
            write_dataset(dataset, &merged)?;
        }
    }

    let failed = rows.iter().filter(|row| row.is_failure()).count();
    let report = HarvestReport {
        path: dataset.to_path_buf(),
        succeeded: rows.len() - failed,
        failed,
        dropped_lines,
        rows,
    };
    info!(
        first,
        last,
        succeeded = report.succeeded,
        failed = report.failed,
        dropped_lines,
        dataset = %dataset.display(),
        "harvest done"
    );
    Ok(report)
}

fn append_rows(path: &Path, rows: &[DatasetRow]) -> ResultsResult<()> {
    let content: String = rows.iter().map(DatasetRow::to_line).collect();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| ResultsError::io(path, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| ResultsError::io(path, e))
}
