//! Read model artifacts from disk.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::models::{ArtifactError, ArtifactFile, Pipeline};

/// Read and parse an artifact JSON file without compiling it.
pub fn read_artifact_json(path: &Path) -> Result<ArtifactFile, ArtifactError> {
    let file = File::open(path)
        .map_err(|e| ArtifactError::Read(format!("Failed to open artifact '{}': {e}", path.display())))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| ArtifactError::Parse(e.to_string()))
}

/// Read an artifact file and compile it into a ready-to-use pipeline.
pub fn load_pipeline(path: &Path) -> Result<Pipeline, ArtifactError> {
    let file = read_artifact_json(path)?;
    Pipeline::from_artifact(file)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::domain::applicant::{ApplicantRecord, columns};
    use crate::domain::prediction::Decision;

    pub(crate) fn bundled_artifact_path() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("artifacts")
            .join("random_forest_class_weight_pipeline.json")
    }

    pub(crate) fn bundled_pipeline() -> Pipeline {
        load_pipeline(&bundled_artifact_path()).unwrap()
    }

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("credit-risk-api-{}-{name}", std::process::id()));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn bundled_artifact_loads() {
        let pipeline = bundled_pipeline();
        assert_eq!(pipeline.classes(), &[0, 1]);
        assert_eq!(pipeline.n_features(), 28);
        assert_eq!(pipeline.metadata().name, "random_forest_class_weight_pipeline");
        assert!(pipeline.estimator_description().starts_with("random forest (3 trees"));
    }

    #[test]
    fn bundled_artifact_scores_known_applicants() {
        let pipeline = bundled_pipeline();

        let result = pipeline.score(&ApplicantRecord::example()).unwrap();
        assert_eq!(result.prediction_status, Decision::Approved);
        assert_eq!(result.probability_approved, "59.99%");

        let mut stretched = ApplicantRecord::example();
        stretched.income_committed = 0.5;
        stretched.loan_amount = 30000.0;
        stretched.credit_history_years = 1;
        let result = pipeline.score(&stretched).unwrap();
        assert_eq!(result.prediction_status, Decision::Denied);
        assert_eq!(result.probability_approved, "14.99%");
    }

    #[test]
    fn bundled_artifact_only_names_applicant_columns() {
        let file = read_artifact_json(&bundled_artifact_path()).unwrap();
        for t in &file.preprocessor.transformers {
            for c in t.columns() {
                assert!(columns::ALL.contains(&c.as_str()), "unexpected column {c}");
            }
        }
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = load_pipeline(Path::new("/nonexistent/model.json")).unwrap_err();
        assert!(matches!(err, ArtifactError::Read(_)));
        assert!(err.to_string().contains("/nonexistent/model.json"));
    }

    #[test]
    fn garbage_is_a_parse_error() {
        let path = temp_file("garbage.json", "not json at all");
        let err = load_pipeline(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, ArtifactError::Parse(_)));
    }

    #[test]
    fn inconsistent_artifact_is_rejected_at_load() {
        let mut file = read_artifact_json(&bundled_artifact_path()).unwrap();
        file.classes = vec![0, 1, 2];
        let path = temp_file("three-classes.json", &serde_json::to_string(&file).unwrap());
        let err = load_pipeline(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, ArtifactError::Invalid(_)));
    }
}
