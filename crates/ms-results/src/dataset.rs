//! The tab-separated dataset the surrogate model trains on.
//!
//! One header-less line per harvested case:
//!
//! ```text
//! mixer_<i>\t<tag line>Np\t<value>
//! mixer_<i>\t<tag line>!SIMULATION FAILED!
//! mixer_<i>\t!SIMULATION FAILED!
//! ```
//!
//! The last form is written when the tag file itself could not be read.
//! A case may appear several times after repeated harvests; readers keep
//! the last row for each case.

use crate::{ResultsError, ResultsResult};
use ms_cases::{format_tag, parse_tag};
use ms_core::{CaseId, ParameterSet, Real, VARIABLE_COUNT, atomic_write};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::warn;

pub const FAILURE_MARKER: &str = "!SIMULATION FAILED!";

const NP_LABEL: &str = "Np";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowOutcome {
    PowerNumber(Real),
    Failed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRow {
    pub case: CaseId,
    /// `None` when the case's tag file could not be read.
    pub parameters: Option<ParameterSet>,
    pub outcome: RowOutcome,
}

impl DatasetRow {
    pub fn is_failure(&self) -> bool {
        self.outcome == RowOutcome::Failed
    }

    /// The row as written to the dataset, newline included.
    pub fn to_line(&self) -> String {
        let mut line = format!("{}\t", self.case.name());
        if let Some(params) = &self.parameters {
            line.push_str(&format_tag(params));
        }
        match self.outcome {
            RowOutcome::PowerNumber(np) => line.push_str(&format!("{NP_LABEL}\t{np:.6}\n")),
            RowOutcome::Failed => {
                line.push_str(FAILURE_MARKER);
                line.push('\n');
            }
        }
        line
    }

    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim_end_matches(['\n', '\r']);
        let (name, rest) = line
            .split_once('\t')
            .ok_or_else(|| "missing case name".to_string())?;
        let case: CaseId = name
            .parse()
            .map_err(|_| format!("'{}' is not a case name", name))?;

        if rest == FAILURE_MARKER {
            return Ok(Self {
                case,
                parameters: None,
                outcome: RowOutcome::Failed,
            });
        }

        let (tag, outcome) = if let Some(tag) = rest.strip_suffix(FAILURE_MARKER) {
            (tag, RowOutcome::Failed)
        } else {
            let marker = format!("{NP_LABEL}\t");
            let at = rest
                .rfind(&marker)
                .ok_or_else(|| "row has neither Np nor failure marker".to_string())?;
            let raw = rest[at + marker.len()..].trim();
            let np = raw
                .parse::<Real>()
                .map_err(|_| format!("Np value '{}' is not a number", raw))?;
            (&rest[..at], RowOutcome::PowerNumber(np))
        };

        Ok(Self {
            case,
            parameters: Some(parse_tag(tag)?),
            outcome,
        })
    }
}

/// `mixer_database_<first>-<last>.txt`
pub fn default_dataset_name(first: usize, last: usize) -> String {
    format!("mixer_database_{}-{}.txt", first, last)
}

/// Every row in file order, duplicates included.
pub fn read_rows(path: &Path) -> ResultsResult<Vec<DatasetRow>> {
    let content = fs::read_to_string(path).map_err(|e| ResultsError::io(path, e))?;
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            DatasetRow::parse(line).map_err(|reason| ResultsError::Format {
                path: path.to_path_buf(),
                line: i + 1,
                reason,
            })
        })
        .collect()
}

/// Like [`read_rows`], but unparseable lines are logged and skipped.
///
/// Returns the readable rows and the number of lines dropped. Used when
/// rewriting a dataset, where a torn or hand-edited line must not block
/// the new rows from landing.
pub fn read_rows_lenient(path: &Path) -> ResultsResult<(Vec<DatasetRow>, usize)> {
    let content = fs::read_to_string(path).map_err(|e| ResultsError::io(path, e))?;
    let mut rows = Vec::new();
    let mut dropped = 0;
    for (i, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match DatasetRow::parse(line) {
            Ok(row) => rows.push(row),
            Err(reason) => {
                warn!(path = %path.display(), line = i + 1, %reason, "dropping unreadable dataset line");
                dropped += 1;
            }
        }
    }
    Ok((rows, dropped))
}

/// Keep the last row seen for each case, ordered by case index.
pub fn reconcile(rows: impl IntoIterator<Item = DatasetRow>) -> Vec<DatasetRow> {
    let mut latest: BTreeMap<CaseId, DatasetRow> = BTreeMap::new();
    for row in rows {
        latest.insert(row.case, row);
    }
    latest.into_values().collect()
}

/// Rows of a dataset with duplicates reconciled.
pub fn read_dataset(path: &Path) -> ResultsResult<Vec<DatasetRow>> {
    Ok(reconcile(read_rows(path)?))
}

/// Replace the dataset with `rows` in one atomic write.
pub fn write_dataset(path: &Path, rows: &[DatasetRow]) -> ResultsResult<()> {
    let content: String = rows.iter().map(DatasetRow::to_line).collect();
    atomic_write(path, content.as_bytes()).map_err(|e| ResultsError::io(path, e))
}

/// Successful rows as `[T/D, H/T, T/C, D/W, D/W_Hub, E/W, theta, Re, Np]`.
pub fn feature_matrix(rows: &[DatasetRow]) -> Vec<[Real; VARIABLE_COUNT + 1]> {
    rows.iter()
        .filter_map(|row| match (row.parameters, row.outcome) {
            (Some(params), RowOutcome::PowerNumber(np)) => {
                let mut features = [0.0; VARIABLE_COUNT + 1];
                features[..VARIABLE_COUNT].copy_from_slice(&params.values());
                features[VARIABLE_COUNT] = np;
                Some(features)
            }
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> ParameterSet {
        ParameterSet::from_values([2.0, 1.2, 3.0, 3.5, 3.5, 0.15, 0.5, 10.0])
    }

    fn row(index: usize, outcome: RowOutcome) -> DatasetRow {
        DatasetRow {
            case: CaseId::new(index),
            parameters: Some(params()),
            outcome,
        }
    }

    #[test]
    fn success_line_layout() {
        let line = row(7, RowOutcome::PowerNumber(603.185789)).to_line();
        assert!(line.starts_with("mixer_7\tT/D\t2.000000\t"));
        assert!(line.ends_with("Re\t10.000000\tNp\t603.185789\n"));
    }

    #[test]
    fn bare_failure_line() {
        let row = DatasetRow {
            case: CaseId::new(3),
            parameters: None,
            outcome: RowOutcome::Failed,
        };
        assert_eq!(row.to_line(), "mixer_3\t!SIMULATION FAILED!\n");
        assert_eq!(DatasetRow::parse(&row.to_line()).unwrap(), row);
    }

    #[test]
    fn parses_failure_with_tag() {
        let original = row(4, RowOutcome::Failed);
        let parsed = DatasetRow::parse(&original.to_line()).unwrap();
        assert_eq!(parsed, original);
        assert!(parsed.is_failure());
    }

    #[test]
    fn rejects_row_without_outcome() {
        let line = format!("mixer_1\t{}", format_tag(&params()));
        assert!(DatasetRow::parse(&line).is_err());
    }

    #[test]
    fn last_row_wins() {
        let rows = vec![
            row(2, RowOutcome::Failed),
            row(1, RowOutcome::PowerNumber(5.0)),
            row(2, RowOutcome::PowerNumber(7.0)),
        ];
        let merged = reconcile(rows);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].case, CaseId::new(1));
        assert_eq!(merged[1].outcome, RowOutcome::PowerNumber(7.0));
    }

    #[test]
    fn features_skip_failures() {
        let rows = vec![
            row(0, RowOutcome::PowerNumber(12.5)),
            row(1, RowOutcome::Failed),
        ];
        let matrix = feature_matrix(&rows);
        assert_eq!(matrix.len(), 1);
        assert_eq!(matrix[0][0], 2.0);
        assert_eq!(matrix[0][VARIABLE_COUNT], 12.5);
    }

    #[test]
    fn read_reports_line_number() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        let good = row(0, RowOutcome::PowerNumber(1.0)).to_line();
        fs::write(&path, format!("{good}\ngarbage\n")).unwrap();
        let err = read_dataset(&path).unwrap_err();
        assert!(matches!(err, ResultsError::Format { line: 3, .. }));
    }

    #[test]
    fn lenient_read_skips_bad_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.txt");
        let good = row(0, RowOutcome::PowerNumber(1.0)).to_line();
        fs::write(&path, format!("{good}mixer_7\tT/D\t2.0000\n\n{good}")).unwrap();
        let (rows, dropped) = read_rows_lenient(&path).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(dropped, 1);
    }

    #[test]
    fn default_name() {
        assert_eq!(default_dataset_name(0, 99999), "mixer_database_0-99999.txt");
    }
}
