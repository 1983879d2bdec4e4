//! HTTP surface.
//!
//! - `GET /` welcome message
//! - `GET /health` liveness + whether the model is loaded
//! - `POST /predict` validate an applicant and score it
//! - `GET /openapi.json` API description

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};

use crate::app::holder::ModelHolder;

pub mod error;
pub mod handlers;
pub mod openapi;

/// Read-only context shared by every request.
#[derive(Debug)]
pub struct AppState {
    pub holder: ModelHolder,
}

impl AppState {
    pub fn new(holder: ModelHolder) -> Self {
        Self { holder }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/predict", post(handlers::predict))
        .route("/openapi.json", get(openapi::document))
        .fallback(handlers::not_found)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use crate::domain::applicant::{
        ApplicantRecord, Choice, Education, Gender, Housing, LoanPurpose, PriorDefault,
    };
    use crate::io::artifact::tests::bundled_pipeline;
    use crate::models::Pipeline;
    use crate::models::artifact::{EstimatorSpec, HandleUnknown, PreprocessorSpec, TransformerSpec};
    use crate::models::pipeline::tests::logistic_artifact;

    fn loaded() -> Router {
        router(Arc::new(AppState::new(ModelHolder::with_pipeline(bundled_pipeline()))))
    }

    fn failed() -> Router {
        let mut holder = ModelHolder::new();
        holder.load(std::path::Path::new("/nonexistent/pipeline.json"));
        router(Arc::new(AppState::new(holder)))
    }

    /// A pipeline whose encoder knows no gender, so every scoring attempt errors.
    fn always_failing() -> Router {
        let mut file = logistic_artifact();
        file.preprocessor = PreprocessorSpec {
            transformers: vec![TransformerSpec::OneHot {
                columns: vec!["genero".to_string()],
                categories: vec![vec!["nenhum".to_string()]],
                handle_unknown: HandleUnknown::Error,
            }],
        };
        file.estimator = EstimatorSpec::LogisticRegression {
            coef: vec![1.0],
            intercept: 0.0,
        };
        let pipeline = Pipeline::from_artifact(file).unwrap();
        router(Arc::new(AppState::new(ModelHolder::with_pipeline(pipeline))))
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let body = match body {
            Some(v) => Body::from(serde_json::to_vec(&v).unwrap()),
            None => Body::empty(),
        };
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(body)
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn example() -> Value {
        serde_json::to_value(ApplicantRecord::example()).unwrap()
    }

    fn is_percentage(s: &str) -> bool {
        let Some(number) = s.strip_suffix('%') else {
            return false;
        };
        let Some((int, frac)) = number.split_once('.') else {
            return false;
        };
        (1..=3).contains(&int.len())
            && int.chars().all(|c| c.is_ascii_digit())
            && frac.len() == 2
            && frac.chars().all(|c| c.is_ascii_digit())
    }

    fn pick<T: Choice>(rng: &mut StdRng) -> T {
        T::ALL[rng.gen_range(0..T::ALL.len())]
    }

    fn random_applicant(rng: &mut StdRng) -> ApplicantRecord {
        ApplicantRecord {
            age: rng.gen_range(18..90),
            gender: pick::<Gender>(rng),
            education: pick::<Education>(rng),
            annual_income: rng.gen_range(1.0..500_000.0),
            experience_years: rng.gen_range(0..50),
            housing: pick::<Housing>(rng),
            loan_amount: rng.gen_range(100.0..50_000.0),
            loan_purpose: pick::<LoanPurpose>(rng),
            interest_rate: rng.gen_range(0.5..25.0),
            income_committed: rng.gen_range(0.0..=1.0),
            credit_history_years: rng.gen_range(1..40),
            credit_score: rng.gen_range(300..850),
            prior_default: pick::<PriorDefault>(rng),
            installments: rng.gen_range(1..120),
        }
    }

    #[tokio::test]
    async fn root_and_health_report_status() {
        let (status, body) = send(loaded(), "GET", "/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], handlers::WELCOME);

        let (status, body) = send(loaded(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok", "pipeline_loaded": true}));

        let (status, body) = send(failed(), "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"status": "ok", "pipeline_loaded": false}));
    }

    #[tokio::test]
    async fn example_applicant_is_scored() {
        let (status, body) = send(loaded(), "POST", "/predict", Some(example())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["prediction_status"], "aprovado");
        assert_eq!(body["probability_approved"], "59.99%");
    }

    #[tokio::test]
    async fn random_valid_applicants_get_well_formed_answers() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let payload = serde_json::to_value(random_applicant(&mut rng)).unwrap();
            let (status, body) = send(loaded(), "POST", "/predict", Some(payload.clone())).await;
            assert_eq!(status, StatusCode::OK, "payload {payload}");
            let label = body["prediction_status"].as_str().unwrap();
            assert!(label == "aprovado" || label == "negado");
            assert!(is_percentage(body["probability_approved"].as_str().unwrap()), "{body}");
        }
    }

    #[tokio::test]
    async fn identical_input_gives_identical_output() {
        let app = loaded();
        let (_, first) = send(app.clone(), "POST", "/predict", Some(example())).await;
        let (_, second) = send(app, "POST", "/predict", Some(example())).await;
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn invalid_fields_are_listed_and_model_is_not_invoked() {
        let mut payload = example();
        payload["idade"] = json!(0);
        payload["genero"] = json!("outro");

        // This model fails on every invocation, so a 500 would mean it ran.
        let (status, body) = send(always_failing(), "POST", "/predict", Some(payload)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let detail = body["detail"].as_array().unwrap();
        assert_eq!(detail.len(), 2);
        assert_eq!(detail[0]["loc"], json!(["body", "idade"]));
        assert_eq!(detail[0]["type"], "greater_than");
        assert_eq!(detail[1]["loc"], json!(["body", "genero"]));
        assert_eq!(detail[1]["type"], "literal_error");
    }

    #[tokio::test]
    async fn malformed_json_is_a_validation_error() {
        let req = Request::builder()
            .method("POST")
            .uri("/predict")
            .body(Body::from("{\"idade\": 21,"))
            .unwrap();
        let resp = loaded().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn unloaded_model_always_answers_503() {
        for payload in [example(), json!({"idade": -1}), json!("nonsense")] {
            let (status, body) = send(failed(), "POST", "/predict", Some(payload)).await;
            assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
            assert_eq!(body["detail"], error::MODEL_UNAVAILABLE);
        }

        let never_loaded = router(Arc::new(AppState::new(ModelHolder::new())));
        let (status, _) = send(never_loaded, "POST", "/predict", Some(example())).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn inference_failure_is_a_500_with_message() {
        let (status, body) = send(always_failing(), "POST", "/predict", Some(example())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.starts_with("Erro durante a predição: "), "{detail}");
        assert!(detail.contains("unknown categories ['feminino']"), "{detail}");
    }

    #[tokio::test]
    async fn openapi_and_fallback() {
        let (status, body) = send(loaded(), "GET", "/openapi.json", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/predict"]["post"].is_object());

        let (status, body) = send(loaded(), "GET", "/docs/nothing-here", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Not Found");
    }
}
