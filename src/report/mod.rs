//! Terminal output for the offline subcommands.
//!
//! Formatting lives here so `app` only decides *what* to print.

use std::path::Path;

use crate::models::Pipeline;

/// Summary printed by `credit-api inspect`.
pub fn format_pipeline_summary(pipeline: &Pipeline, path: &Path) -> String {
    let meta = pipeline.metadata();
    let mut out = String::new();

    out.push_str("=== credit-api - model artifact ===\n");
    out.push_str(&format!("Path: {}\n", path.display()));
    out.push_str(&format!("Name: {}\n", meta.name));
    if let Some(date) = meta.trained_on {
        out.push_str(&format!("Trained on: {date}\n"));
    }
    if let Some(description) = &meta.description {
        out.push_str(&format!("Description: {description}\n"));
    }
    let classes: Vec<String> = pipeline.classes().iter().map(i64::to_string).collect();
    out.push_str(&format!("Classes: [{}]\n", classes.join(", ")));
    out.push_str(&format!("Features: {}\n", pipeline.n_features()));
    out.push_str(&format!("Estimator: {}\n", pipeline.estimator_description()));
    out
}

/// One-line answer printed by `credit-api probe`.
pub fn format_probe(url: &str, status: &str, pipeline_loaded: bool) -> String {
    format!("{url}: status={status} pipeline_loaded={pipeline_loaded}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::artifact::tests::{bundled_artifact_path, bundled_pipeline};

    #[test]
    fn summary_lists_key_facts() {
        let text = format_pipeline_summary(&bundled_pipeline(), &bundled_artifact_path());
        assert!(text.contains("Name: random_forest_class_weight_pipeline"));
        assert!(text.contains("Description: Hand-built stand-in for the production model"));
        assert!(!text.contains("Trained on:"));
        assert!(text.contains("Classes: [0, 1]"));
        assert!(text.contains("Features: 28"));
        assert!(text.contains("Estimator: random forest (3 trees, 21 nodes)"));
    }

    #[test]
    fn summary_shows_training_date_when_present() {
        let mut file = crate::models::pipeline::tests::logistic_artifact();
        file.metadata.trained_on = chrono::NaiveDate::from_ymd_opt(2025, 6, 30);
        let pipeline = Pipeline::from_artifact(file).unwrap();
        let text = format_pipeline_summary(&pipeline, Path::new("model.json"));
        assert!(text.contains("Trained on: 2025-06-30"));
        assert!(text.contains("Estimator: logistic regression (3 coefficients)"));
    }

    #[test]
    fn probe_line_is_compact() {
        assert_eq!(
            format_probe("http://127.0.0.1:8000/health", "ok", false),
            "http://127.0.0.1:8000/health: status=ok pipeline_loaded=false"
        );
    }
}
