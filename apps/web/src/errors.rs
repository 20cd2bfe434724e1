use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Shown for every network or response-format failure. Details go to the log only.
pub const ANALYSIS_FAILED_MESSAGE: &str = "Analysis failed. Please check your API key and try again.";

/// Shown when an uploaded resume could not be turned into text.
pub const DECODE_FAILED_MESSAGE: &str =
    "Error processing file. Please try again or paste the text manually.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Analysis error: {0}")]
    Analysis(String),

    #[error("Response schema violated: {}", .0.join("; "))]
    Schema(Vec<String>),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Text suitable for a blocking notification in the browser UI.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Configuration(msg) | AppError::Validation(msg) => msg.clone(),
            AppError::Decode(_) => DECODE_FAILED_MESSAGE.to_string(),
            AppError::Analysis(_) => ANALYSIS_FAILED_MESSAGE.to_string(),
            AppError::Schema(violations) => format!(
                "The analysis came back in an unexpected shape ({} problem{}). Please try again.",
                violations.len(),
                if violations.len() == 1 { "" } else { "s" }
            ),
            AppError::NotFound(msg) => msg.clone(),
            AppError::Internal(_) => "An internal error occurred".to_string(),
        }
    }

    /// Logs the underlying detail for errors whose user message hides it.
    pub fn log(&self) {
        match self {
            AppError::Decode(detail) => tracing::warn!("PDF decode failed: {detail}"),
            AppError::Analysis(detail) => tracing::error!("Analysis error: {detail}"),
            AppError::Schema(violations) => {
                tracing::warn!("Analysis schema violations: {violations:?}")
            }
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            _ => {}
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();

        let (status, code) = match &self {
            AppError::Configuration(_) => (StatusCode::SERVICE_UNAVAILABLE, "CONFIGURATION_ERROR"),
            AppError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            AppError::Decode(_) => (StatusCode::UNPROCESSABLE_ENTITY, "DECODE_ERROR"),
            AppError::Analysis(_) => (StatusCode::BAD_GATEWAY, "ANALYSIS_FAILED"),
            AppError::Schema(_) => (StatusCode::BAD_GATEWAY, "SCHEMA_VIOLATION"),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            AppError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };

        let mut error = json!({
            "code": code,
            "message": self.user_message(),
        });
        if let AppError::Schema(violations) = &self {
            error["violations"] = json!(violations);
        }

        (status, Json(json!({ "error": error }))).into_response()
    }
}
