//! Input/output helpers.
//!
//! - model artifact read + compile (`artifact`)

pub mod artifact;

pub use artifact::{load_pipeline, read_artifact_json};
