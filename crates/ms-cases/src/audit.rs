//! Completion audit: case status from the files in its directory.
//!
//! The scheduler writes `<job name>-<restart>.out` logs into the case
//! directory, the solver appends its torque series to `torque.00.dat` as it
//! goes and prints [`COMPLETION_BANNER`] only when it terminates normally.
//! That is enough to tell apart a finished case, one that ran out of wall
//! time and can be continued, and one that died.

use crate::case::CaseStatus;
use crate::layout::{CaseLayout, TORQUE_FILE};
use ms_core::CaseId;
use std::fs::{self, File};
use std::io::{self, Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

/// Table rule the solver prints after its final timing summary.
pub const COMPLETION_BANNER: &str =
    "+---------------------------------+-----------+------------+------------+";

/// How many trailing log lines may hold the banner.
pub const BANNER_WINDOW: usize = 10;

/// Bytes read from the end of a log; comfortably more than
/// `BANNER_WINDOW` lines of solver output.
const TAIL_BYTES: u64 = 16 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFile {
    pub path: PathBuf,
    pub restart: u64,
}

/// Highest-numbered `<job_name>-<n>.out` in `case_dir`.
pub fn latest_log(case_dir: &Path, job_name: &str) -> Option<LogFile> {
    let prefix = format!("{}-", job_name);
    let entries = fs::read_dir(case_dir).ok()?;

    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name();
            let restart = name
                .to_str()?
                .strip_prefix(&prefix)?
                .strip_suffix(".out")?
                .parse::<u64>()
                .ok()?;
            Some(LogFile {
                path: entry.path(),
                restart,
            })
        })
        .max_by_key(|log| log.restart)
}

fn has_banner(log: &Path) -> bool {
    let Ok(tail) = read_tail(log, TAIL_BYTES) else {
        return false;
    };
    // Solver output may carry stray bytes; lossy decoding keeps the scan going.
    let text = String::from_utf8_lossy(&tail);
    text.lines()
        .rev()
        .take(BANNER_WINDOW)
        .any(|line| line.trim_end() == COMPLETION_BANNER)
}

/// Last `limit` bytes of `path`. When the file is longer, the partial first
/// line of the window is dropped.
fn read_tail(path: &Path, limit: u64) -> io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let len = file.metadata()?.len();
    let start = len.saturating_sub(limit);
    file.seek(SeekFrom::Start(start))?;

    let mut buf = Vec::with_capacity((len - start) as usize);
    file.read_to_end(&mut buf)?;
    if start > 0 {
        match buf.iter().position(|&b| b == b'\n') {
            Some(newline) => {
                buf.drain(..=newline);
            }
            None => buf.clear(),
        }
    }
    Ok(buf)
}

/// Infer the post-run status of the case stored in `case_dir`.
///
/// The job name is the directory name. Returns `Completed`, `NeedsResubmit`
/// or `Failed`; earlier lifecycle states need scheduler knowledge and are
/// resolved by the caller.
pub fn infer_status(case_dir: &Path) -> CaseStatus {
    let job_name = case_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    if let Some(log) = latest_log(case_dir, &job_name)
        && has_banner(&log.path)
    {
        return CaseStatus::Completed;
    }
    if case_dir.join(TORQUE_FILE).is_file() {
        return CaseStatus::NeedsResubmit;
    }
    CaseStatus::Failed
}

pub fn audit(layout: &CaseLayout, id: CaseId) -> CaseStatus {
    infer_status(&layout.case_dir(id))
}
