//! Persisted dispatch frontier.
//!
//! Three small text files in the campaign state directory:
//! - `first_mixer.txt`: first frontier index of the latest batch
//! - `last_mixer.txt`: last frontier index submitted so far
//! - `retry_mixers.txt`: indices at or below the frontier whose submission
//!   failed, one per line
//!
//! A missing file, an empty file or `-1` means "none".

use crate::error::{DispatchError, DispatchResult};
use ms_core::atomic_write;
use std::collections::BTreeSet;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub const FIRST_FILE: &str = "first_mixer.txt";
pub const LAST_FILE: &str = "last_mixer.txt";
pub const RETRY_FILE: &str = "retry_mixers.txt";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchState {
    pub first: Option<usize>,
    pub last: Option<usize>,
    pub retry: BTreeSet<usize>,
}

impl DispatchState {
    /// First index that has never been attempted.
    pub fn next_frontier(&self) -> usize {
        self.last.map_or(0, |last| last + 1)
    }

    /// Whether a job for `index` has been handed to the scheduler.
    pub fn is_submitted(&self, index: usize) -> bool {
        self.last.is_some_and(|last| index <= last) && !self.retry.contains(&index)
    }
}

#[derive(Debug, Clone)]
pub struct WatermarkStore {
    dir: PathBuf,
}

impl WatermarkStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn load(&self) -> DispatchResult<DispatchState> {
        Ok(DispatchState {
            first: read_index(&self.dir.join(FIRST_FILE))?,
            last: read_index(&self.dir.join(LAST_FILE))?,
            retry: read_index_set(&self.dir.join(RETRY_FILE))?,
        })
    }

    /// Each file is replaced atomically; `last` is written last so a reader
    /// never sees a frontier ahead of its retry set.
    pub fn save(&self, state: &DispatchState) -> DispatchResult<()> {
        let retry: String = state.retry.iter().map(|i| format!("{i}\n")).collect();
        write(&self.dir.join(RETRY_FILE), &retry)?;
        write(&self.dir.join(FIRST_FILE), &format_index(state.first))?;
        write(&self.dir.join(LAST_FILE), &format_index(state.last))?;
        Ok(())
    }
}

fn format_index(index: Option<usize>) -> String {
    match index {
        Some(i) => i.to_string(),
        None => "-1".to_string(),
    }
}

fn write(path: &Path, content: &str) -> DispatchResult<()> {
    atomic_write(path, content.as_bytes()).map_err(|source| DispatchError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional(path: &Path) -> DispatchResult<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(source) => Err(DispatchError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn parse_index(path: &Path, token: &str) -> DispatchResult<Option<usize>> {
    let value: i64 = token.parse().map_err(|_| DispatchError::Watermark {
        path: path.to_path_buf(),
        reason: format!("'{token}' is not an integer"),
    })?;
    Ok(usize::try_from(value).ok())
}

fn read_index(path: &Path) -> DispatchResult<Option<usize>> {
    let Some(content) = read_optional(path)? else {
        return Ok(None);
    };
    let token = content.trim();
    if token.is_empty() {
        return Ok(None);
    }
    parse_index(path, token)
}

fn read_index_set(path: &Path) -> DispatchResult<BTreeSet<usize>> {
    let Some(content) = read_optional(path)? else {
        return Ok(BTreeSet::new());
    };
    let mut set = BTreeSet::new();
    for token in content.split_whitespace() {
        if let Some(index) = parse_index(path, token)? {
            set.insert(index);
        }
    }
    Ok(set)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_directory_means_nothing_submitted() {
        let dir = tempfile::tempdir().unwrap();
        let state = WatermarkStore::new(dir.path()).load().unwrap();
        assert_eq!(state, DispatchState::default());
        assert_eq!(state.next_frontier(), 0);
    }

    #[test]
    fn save_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = WatermarkStore::new(dir.path().join("utils"));
        let state = DispatchState {
            first: Some(950),
            last: Some(999),
            retry: [12, 977].into_iter().collect(),
        };
        store.save(&state).unwrap();

        assert_eq!(store.load().unwrap(), state);
        assert_eq!(
            fs::read_to_string(dir.path().join("utils").join(LAST_FILE)).unwrap(),
            "999"
        );
    }

    #[test]
    fn legacy_minus_one_is_none() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LAST_FILE), "-1\n").unwrap();
        let state = WatermarkStore::new(dir.path()).load().unwrap();
        assert_eq!(state.last, None);
    }

    #[test]
    fn garbage_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(LAST_FILE), "forty").unwrap();
        let err = WatermarkStore::new(dir.path()).load().unwrap_err();
        assert!(matches!(err, DispatchError::Watermark { .. }));
    }

    #[test]
    fn retried_cases_are_not_submitted() {
        let state = DispatchState {
            first: Some(0),
            last: Some(10),
            retry: [4].into_iter().collect(),
        };
        assert!(state.is_submitted(3));
        assert!(!state.is_submitted(4));
        assert!(!state.is_submitted(11));
        assert_eq!(state.next_frontier(), 11);
    }
}
