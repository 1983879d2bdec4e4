//! On-disk schema of a model artifact.
//!
//! An artifact is a JSON document produced by the training side. It is the
//! "portable" form of a fitted pipeline:
//! - metadata (name, description, training date)
//! - the ordered class labels
//! - a column preprocessor (scaling / one-hot / passthrough)
//! - a fitted estimator (random forest or logistic regression)
//!
//! These types only describe the file. `Pipeline::from_artifact` checks the
//! structure and compiles it into the form used at inference time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The only `format_version` this build understands.
pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactFile {
    pub format_version: u32,
    pub metadata: ArtifactMetadata,
    pub classes: Vec<i64>,
    pub preprocessor: PreprocessorSpec,
    pub estimator: EstimatorSpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtifactMetadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trained_on: Option<NaiveDate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreprocessorSpec {
    pub transformers: Vec<TransformerSpec>,
}

/// What to do with a category the encoder was not fitted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HandleUnknown {
    #[default]
    Error,
    Ignore,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TransformerSpec {
    StandardScaler {
        columns: Vec<String>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    OneHot {
        columns: Vec<String>,
        categories: Vec<Vec<String>>,
        #[serde(default)]
        handle_unknown: HandleUnknown,
    },
    Passthrough {
        columns: Vec<String>,
    },
}

impl TransformerSpec {
    pub fn columns(&self) -> &[String] {
        match self {
            TransformerSpec::StandardScaler { columns, .. }
            | TransformerSpec::OneHot { columns, .. }
            | TransformerSpec::Passthrough { columns } => columns,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimatorSpec {
    RandomForest { trees: Vec<TreeSpec> },
    LogisticRegression { coef: Vec<f64>, intercept: f64 },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreeSpec {
    pub nodes: Vec<NodeSpec>,
}

/// Node of a binary decision tree; node `0` is the root.
///
/// A split sends a row left when `x[feature] <= threshold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeSpec {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: Vec<f64>,
    },
}

/// Why an artifact could not be turned into a usable pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactError {
    /// The file could not be opened or read.
    Read(String),
    /// The file is not a well-formed artifact document.
    Parse(String),
    UnsupportedVersion(u32),
    /// Structurally parsed, but internally inconsistent.
    Invalid(String),
}

impl ArtifactError {
    pub fn invalid(message: impl Into<String>) -> Self {
        ArtifactError::Invalid(message.into())
    }
}

impl std::fmt::Display for ArtifactError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArtifactError::Read(msg) => write!(f, "{msg}"),
            ArtifactError::Parse(msg) => write!(f, "invalid artifact JSON: {msg}"),
            ArtifactError::UnsupportedVersion(v) => write!(
                f,
                "unsupported artifact format_version {v} (expected {FORMAT_VERSION})"
            ),
            ArtifactError::Invalid(msg) => write!(f, "invalid artifact: {msg}"),
        }
    }
}

impl std::error::Error for ArtifactError {}
