//! Executable model pipeline: preprocessor + estimator + class labels.
//!
//! The pipeline exposes the two operations the service relies on:
//! - `predict`: the discrete class for a single-row table
//! - `predict_proba`: the probability of each class, in `classes()` order
//!
//! `score` combines both for an applicant record.

use crate::domain::applicant::ApplicantRecord;
use crate::domain::prediction::{APPROVED_CLASS, PredictionResult};
use crate::math::argmax;
use crate::models::artifact::{ArtifactError, ArtifactFile, ArtifactMetadata, FORMAT_VERSION};
use crate::models::estimator::Estimator;
use crate::models::frame::Frame;
use crate::models::preprocess::Preprocessor;

/// Failure while running a loaded pipeline on one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InferenceError {
    message: String,
}

impl InferenceError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for InferenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for InferenceError {}

#[derive(Debug, Clone)]
pub struct Pipeline {
    metadata: ArtifactMetadata,
    classes: Vec<i64>,
    preprocessor: Preprocessor,
    estimator: Estimator,
}

impl Pipeline {
    /// Check an artifact document and compile it for inference.
    pub fn from_artifact(file: ArtifactFile) -> Result<Self, ArtifactError> {
        if file.format_version != FORMAT_VERSION {
            return Err(ArtifactError::UnsupportedVersion(file.format_version));
        }
        if file.classes.len() < 2 {
            return Err(ArtifactError::invalid("at least two classes are required"));
        }
        let mut seen = file.classes.clone();
        seen.sort_unstable();
        seen.dedup();
        if seen.len() != file.classes.len() {
            return Err(ArtifactError::invalid("class labels must be distinct"));
        }

        let preprocessor = Preprocessor::compile(file.preprocessor.transformers)?;
        let estimator = Estimator::compile(file.estimator, preprocessor.width(), file.classes.len())?;

        Ok(Self {
            metadata: file.metadata,
            classes: file.classes,
            preprocessor,
            estimator,
        })
    }

    pub fn metadata(&self) -> &ArtifactMetadata {
        &self.metadata
    }

    pub fn classes(&self) -> &[i64] {
        &self.classes
    }

    pub fn n_features(&self) -> usize {
        self.preprocessor.width()
    }

    pub fn estimator_description(&self) -> String {
        self.estimator.describe()
    }

    pub fn predict_proba(&self, frame: &Frame) -> Result<Vec<f64>, InferenceError> {
        let x = self.preprocessor.transform(frame)?;
        self.estimator.predict_proba(&x, self.classes.len())
    }

    pub fn predict(&self, frame: &Frame) -> Result<i64, InferenceError> {
        let proba = self.predict_proba(frame)?;
        self.class_of(&proba)
    }

    fn class_of(&self, proba: &[f64]) -> Result<i64, InferenceError> {
        argmax(proba)
            .map(|i| self.classes[i])
            .ok_or_else(|| InferenceError::new("model produced no class probabilities"))
    }

    /// Classify one applicant and report the approved-class probability.
    ///
    /// The model runs once; the class is the argmax of that same output.
    pub fn score(&self, record: &ApplicantRecord) -> Result<PredictionResult, InferenceError> {
        let frame = Frame::from_applicant(record);
        let proba = self.predict_proba(&frame)?;
        let class = self.class_of(&proba)?;

        let approved = self
            .classes
            .iter()
            .position(|c| *c == APPROVED_CLASS)
            .ok_or_else(|| InferenceError::new(format!("model has no class {APPROVED_CLASS} (approved)")))?;

        Ok(PredictionResult::new(class, proba[approved]))
    }
}
