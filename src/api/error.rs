//! HTTP error responses.
//!
//! All error bodies share the `{"detail": ...}` envelope: a string for 503
//! and 500, the list of field errors for 422.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::domain::validation::ValidationErrors;

pub const MODEL_UNAVAILABLE: &str = "Modelo não está disponível. Verifique os logs do servidor.";

#[derive(Debug)]
pub enum ApiError {
    /// The model holder is not `Loaded`.
    ModelUnavailable,
    Validation(ValidationErrors),
    /// Anything that went wrong while building the table or running the model.
    Inference(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::ModelUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Inference(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::ModelUnavailable => json!({ "detail": MODEL_UNAVAILABLE }),
            ApiError::Validation(errors) => json!({ "detail": errors.errors }),
            ApiError::Inference(msg) => json!({ "detail": format!("Erro durante a predição: {msg}") }),
        };
        (status, Json(body)).into_response()
    }
}
