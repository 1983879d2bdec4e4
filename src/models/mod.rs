//! Model pipeline: artifact schema, preprocessing, and estimators.
//!
//! The service treats the artifact as a black box contract: whatever
//! encoding it declares is what gets applied. Nothing here knows which
//! columns are categorical beyond what the artifact says.

pub mod artifact;
pub mod estimator;
pub mod frame;
pub mod pipeline;
pub mod preprocess;

pub use artifact::{ArtifactError, ArtifactFile, ArtifactMetadata};
pub use frame::{Cell, Frame};
pub use pipeline::{InferenceError, Pipeline};
