//! Content-based identity of a design.

use crate::design::VariableRange;
use sha2::{Digest, Sha256};

/// Hex SHA-256 over the inputs that fully determine a design.
pub fn design_fingerprint(ranges: &[VariableRange], sample_count: usize, seed: u64) -> String {
    let mut hasher = Sha256::new();

    for range in ranges {
        hasher.update(range.min.to_le_bytes());
        hasher.update(range.max.to_le_bytes());
    }
    hasher.update((sample_count as u64).to_le_bytes());
    hasher.update(seed.to_le_bytes());

    let result = hasher.finalize();
    format!("{:x}", result)
}
