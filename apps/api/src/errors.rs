use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::analysis::AnalysisFailure;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Analysis(#[from] AnalysisFailure),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Analysis(AnalysisFailure::MalformedResponse(_))
            | AppError::Analysis(AnalysisFailure::MissingField(_)) => StatusCode::BAD_REQUEST,
            AppError::Analysis(AnalysisFailure::UpstreamError(_)) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// The single human-readable message shown to callers.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Analysis(failure) => failure.to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }

    /// Raw upstream text for diagnosis, when the failure carries one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            AppError::Analysis(failure) => failure.raw_text(),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Internal(e) = &self {
            tracing::error!("Internal error: {e:?}");
        }

        let mut body = json!({ "error": self.user_message() });
        if let Some(raw) = self.raw_response() {
            body["raw_response"] = json!(raw);
        }

        (self.status(), Json(body)).into_response()
    }
}
