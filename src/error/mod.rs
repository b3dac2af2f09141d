use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Every way a preview request can fail. The `Display` text is the exact
/// message returned to the caller in the `error` field.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("URL is required")]
    MissingUrl,

    #[error("Invalid URL")]
    InvalidUrl,

    #[error("Request timeout")]
    Timeout,

    #[error("Failed to fetch URL: {status} {reason}")]
    FetchFailed { status: u16, reason: String },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Failed to extract metadata: {0}")]
    Extraction(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::MissingUrl | AppError::InvalidUrl => StatusCode::BAD_REQUEST,
            AppError::Timeout
            | AppError::FetchFailed { .. }
            | AppError::Network(_)
            | AppError::Extraction(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            AppError::MissingUrl | AppError::InvalidUrl => {}
            AppError::Extraction(detail) => {
                tracing::error!(detail = %detail, "Metadata extraction failed");
            }
            other => {
                tracing::warn!(error = %other, "Preview fetch failed");
            }
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
