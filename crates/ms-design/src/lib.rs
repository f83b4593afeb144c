//! ms-design: space-filling designs of experiments for impeller campaigns.
//!
//! Provides:
//! - Center-of-cell Latin Hypercube sampling in the unit hypercube
//! - Affine mapping of unit samples into physical variable ranges
//! - Fixed (non-sampled) variables through [`DesignSpace`]
//! - A content fingerprint identifying a design by its inputs

pub mod design;
pub mod error;
pub mod fingerprint;
pub mod lhs;

pub use design::{DesignSpace, ExperimentDesign, VariableRange, VariableSpec, generate_design};
pub use error::{DesignError, DesignResult};
pub use fingerprint::design_fingerprint;
pub use lhs::unit_design;
