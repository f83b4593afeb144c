//! Reading the solver's torque series and turning it into a power number.

use ms_core::{ParameterSet, Real};
use std::f64::consts::PI;
use std::fs;
use std::path::{Path, PathBuf};

/// Zero-based column of the z torque in `torque.00.dat`
/// (`time T_x T_y T_z`).
pub const TORQUE_COLUMN: usize = 3;

/// Why a case produced no power number. Each one becomes a sentinel row.
#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    #[error("tag file unusable: {0}")]
    Tag(String),

    #[error("torque file {path} missing")]
    MissingTorque { path: PathBuf },

    #[error("reading {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("torque file {path} has no data")]
    EmptyTorque { path: PathBuf },

    #[error("last torque row has {found} columns, need {}", TORQUE_COLUMN + 1)]
    MissingColumn { found: usize },

    #[error("torque value '{value}' is not a number")]
    InvalidTorque { value: String },

    #[error("non-finite power number from torque {torque} and T/D {td}")]
    NonFinite { torque: Real, td: Real },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TorqueReading {
    pub torque: Real,
    pub power_number: Real,
}

/// z torque from the last non-empty line of a torque series.
pub fn read_last_torque(path: &Path) -> Result<Real, HarvestError> {
    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            HarvestError::MissingTorque {
                path: path.to_path_buf(),
            }
        } else {
            HarvestError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let last = content
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .ok_or_else(|| HarvestError::EmptyTorque {
            path: path.to_path_buf(),
        })?;

    let columns: Vec<&str> = last.split_whitespace().collect();
    let raw = columns
        .get(TORQUE_COLUMN)
        .ok_or(HarvestError::MissingColumn {
            found: columns.len(),
        })?;
    raw.parse::<Real>()
        .map_err(|_| HarvestError::InvalidTorque {
            value: (*raw).to_string(),
        })
}

/// `Np = 2πT / D⁵` with the impeller diameter `D = 1 / (T/D)`.
pub fn power_number(torque: Real, params: &ParameterSet) -> Result<TorqueReading, HarvestError> {
    let d = params.impeller_diameter();
    let np = 2.0 * PI * torque / d.powi(5);
    if !np.is_finite() {
        return Err(HarvestError::NonFinite {
            torque,
            td: params.td,
        });
    }
    Ok(TorqueReading {
        torque,
        power_number: np,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(td: Real) -> ParameterSet {
        ParameterSet::from_values([td, 1.2, 3.0, 3.5, 3.5, 0.15, 0.5, 10.0])
    }

    #[test]
    fn power_number_from_torque() {
        let reading = power_number(3.0, &params(2.0)).unwrap();
        assert!((reading.power_number - 603.19).abs() < 0.01);
        assert_eq!(reading.torque, 3.0);
    }

    #[test]
    fn zero_tank_ratio_is_not_finite() {
        assert!(matches!(
            power_number(3.0, &params(0.0)),
            Err(HarvestError::NonFinite { .. })
        ));
    }

    #[test]
    fn last_line_column_three() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("torque.00.dat");
        fs::write(
            &path,
            "time T_x T_y T_z\n0.1 0.0 0.0 1.5\n0.2  0.0\t0.0  3.0\n\n",
        )
        .unwrap();
        assert_eq!(read_last_torque(&path).unwrap(), 3.0);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_last_torque(&dir.path().join("torque.00.dat")).unwrap_err();
        assert!(matches!(err, HarvestError::MissingTorque { .. }));
    }

    #[test]
    fn short_row() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("torque.00.dat");
        fs::write(&path, "0.1 0.0\n").unwrap();
        assert!(matches!(
            read_last_torque(&path),
            Err(HarvestError::MissingColumn { found: 2 })
        ));
    }

    #[test]
    fn garbage_value() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("torque.00.dat");
        fs::write(&path, "0.1 0.0 0.0 nan?\n").unwrap();
        assert!(matches!(
            read_last_torque(&path),
            Err(HarvestError::InvalidTorque { .. })
        ));
    }

    #[test]
    fn blank_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("torque.00.dat");
        fs::write(&path, "\n  \n").unwrap();
        assert!(matches!(
            read_last_torque(&path),
            Err(HarvestError::EmptyTorque { .. })
        ));
    }
}
