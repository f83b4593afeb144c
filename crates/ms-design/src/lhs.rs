//! Center-of-cell Latin Hypercube sampling.
//!
//! Each dimension is cut into `n` equal strata and every stratum receives
//! exactly one sample placed at its center. Strata are paired across
//! dimensions by independent seeded shuffles.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

/// Generate `samples` points in `[0, 1]^dims`.
///
/// Rows are samples, columns are dimensions. The shuffles consume the RNG
/// dimension by dimension, so the same `(dims, samples, seed)` always yields
/// the same matrix.
pub fn unit_design(dims: usize, samples: usize, seed: u64) -> Vec<Vec<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = vec![vec![0.0; dims]; samples];

    for d in 0..dims {
        let mut centers = strata_centers(samples);
        centers.shuffle(&mut rng);
        for (row, value) in rows.iter_mut().zip(centers) {
            row[d] = value;
        }
    }

    rows
}

fn strata_centers(samples: usize) -> Vec<f64> {
    let n = samples as f64;
    (0..samples).map(|k| (k as f64 + 0.5) / n).collect()
}

/// Index of the stratum a unit value falls in.
pub fn stratum_of(value: f64, samples: usize) -> usize {
    ((value * samples as f64).floor() as usize).min(samples.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centers_are_cell_midpoints() {
        let c = strata_centers(4);
        assert_eq!(c, vec![0.125, 0.375, 0.625, 0.875]);
    }

    #[test]
    fn every_stratum_used_once_per_dimension() {
        let n = 37;
        let rows = unit_design(8, n, 11);
        assert_eq!(rows.len(), n);
        for d in 0..8 {
            let mut seen = vec![false; n];
            for row in &rows {
                let s = stratum_of(row[d], n);
                assert!(!seen[s], "stratum {s} used twice in dimension {d}");
                seen[s] = true;
            }
            assert!(seen.iter().all(|&s| s));
        }
    }

    #[test]
    fn same_seed_same_design() {
        assert_eq!(unit_design(3, 20, 5), unit_design(3, 20, 5));
    }

    #[test]
    fn different_seed_different_design() {
        assert_ne!(unit_design(3, 20, 5), unit_design(3, 20, 6));
    }

    #[test]
    fn single_sample_sits_at_center() {
        let rows = unit_design(2, 1, 0);
        assert_eq!(rows, vec![vec![0.5, 0.5]]);
    }
}
