use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::review::ReviewError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("LLM timeout: {0}")]
    LlmTimeout(String),
}

impl From<ReviewError> for AppError {
    fn from(err: ReviewError) -> Self {
        let detail = err.to_string();
        match err {
            ReviewError::Validation(msg) => AppError::Validation(msg),
            ReviewError::Timeout { .. } => AppError::LlmTimeout(detail),
            ReviewError::ExternalService(_) => AppError::Llm(detail),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::BAD_GATEWAY,
                    "LLM_ERROR",
                    "The review service could not get a reply from the language model".to_string(),
                )
            }
            AppError::LlmTimeout(msg) => {
                tracing::error!("LLM timeout: {msg}");
                (
                    StatusCode::GATEWAY_TIMEOUT,
                    "LLM_TIMEOUT",
                    "The language model did not reply in time".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
