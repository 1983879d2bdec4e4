//! Route handlers.

use std::any::Any;
use std::sync::Arc;
use std::time::Instant;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;
use serde_json::{Value, json};
use tokio::task::JoinError;
use tracing::{error, info, warn};

use crate::api::AppState;
use crate::api::error::ApiError;
use crate::domain::prediction::PredictionResult;
use crate::domain::validation::parse_applicant;

pub const WELCOME: &str = "Bem-vindo à API de Risco de Crédito. Acesse /openapi.json para a documentação.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub pipeline_loaded: bool,
}

/// GET /
pub async fn root() -> Json<Value> {
    Json(json!({ "message": WELCOME }))
}

/// GET /health
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        pipeline_loaded: state.holder.is_loaded(),
    })
}

/// POST /predict
///
/// Order matters: model availability is checked before the body is even
/// parsed, and the body is fully validated before the model runs.
pub async fn predict(State(state): State<Arc<AppState>>, body: Bytes) -> Result<Json<PredictionResult>, ApiError> {
    let Some(pipeline) = state.holder.pipeline().cloned() else {
        warn!(state = state.holder.state().name(), "prediction refused: model not loaded");
        return Err(ApiError::ModelUnavailable);
    };

    let record = parse_applicant(&body).map_err(|errors| {
        info!(fields = ?errors.fields(), count = errors.errors.len(), "prediction request rejected");
        ApiError::Validation(errors)
    })?;

    let started = Instant::now();
    let result = tokio::task::spawn_blocking(move || pipeline.score(&record))
        .await
        .map_err(|e| {
            let msg = join_error_message(e);
            error!(error = %msg, "model invocation aborted");
            ApiError::Inference(msg)
        })?
        .map_err(|e| {
            error!(error = %e, "model invocation failed");
            ApiError::Inference(e.to_string())
        })?;

    info!(
        status = result.prediction_status.label(),
        probability_approved = %result.probability_approved,
        elapsed_us = started.elapsed().as_micros() as u64,
        "prediction served"
    );
    Ok(Json(result))
}

/// Anything not routed.
pub async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" })))
}

fn join_error_message(e: JoinError) -> String {
    if e.is_panic() {
        panic_message(e.into_panic())
    } else {
        e.to_string()
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "model panicked".to_string()
    }
}
