//! ms-core: stable foundation for mixsim.
//!
//! Contains:
//! - variables (the eight design variables and a case's physical parameters)
//! - numeric (Real + float helpers)
//! - ids (case identifiers and the names derived from them)
//! - error (shared error types)
//! - fsutil (atomic file replacement)

pub mod error;
pub mod fsutil;
pub mod ids;
pub mod numeric;
pub mod variables;

// Re-exports: nice ergonomics for downstream crates
pub use error::{CoreError, CoreResult};
pub use fsutil::atomic_write;
pub use ids::*;
pub use numeric::*;
pub use variables::*;
