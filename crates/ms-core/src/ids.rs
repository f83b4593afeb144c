use core::fmt;
use core::str::FromStr;

use crate::CoreError;

/// Prefix shared by case directories, job names and dataset row ids.
pub const CASE_PREFIX: &str = "mixer_";

/// Index of one simulation case within a campaign.
///
/// The same string (`mixer_<index>`) names the case directory, the batch
/// job and the dataset row, which is how scheduler logs are correlated back
/// to cases.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaseId(usize);

impl CaseId {
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }

    /// `mixer_<index>`
    pub fn name(self) -> String {
        format!("{}{}", CASE_PREFIX, self.0)
    }
}

impl From<usize> for CaseId {
    fn from(index: usize) -> Self {
        Self(index)
    }
}

impl FromStr for CaseId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix(CASE_PREFIX)
            .and_then(|rest| rest.parse::<usize>().ok())
            .map(Self)
            .ok_or_else(|| CoreError::InvalidCaseName {
                name: s.to_string(),
            })
    }
}

impl fmt::Debug for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CaseId({})", self.0)
    }
}

impl fmt::Display for CaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_round_trip() {
        for i in [0_usize, 1, 2, 42, 99_999] {
            let id = CaseId::new(i);
            let parsed: CaseId = id.name().parse().unwrap();
            assert_eq!(parsed, id);
        }
    }

    #[test]
    fn rejects_foreign_names() {
        assert!("mixer_".parse::<CaseId>().is_err());
        assert!("mixer_x1".parse::<CaseId>().is_err());
        assert!("tank_3".parse::<CaseId>().is_err());
    }
}
