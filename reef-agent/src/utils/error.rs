//! HTTP-boundary error handling
//!
//! Every failure reaches the caller as `{"success": false, "message": …}`
//! with a human-readable reason; stack traces never leave the process.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

use crate::printing::DispatchError;

/// Application error for route handlers
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Missing or malformed request field (400)
    #[error("{0}")]
    Validation(String),

    /// Print pipeline failure (500)
    #[error("{0}")]
    PrintFailed(String),

    /// Unexpected internal failure (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<DispatchError> for AppError {
    fn from(e: DispatchError) -> Self {
        Self::PrintFailed(e.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::PrintFailed(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        if status.is_server_error() {
            error!(message = %self, "request failed");
        }

        let body = Json(serde_json::json!({
            "success": false,
            "message": self.to_string(),
        }));

        (status, body).into_response()
    }
}

/// Result type for route handlers
pub type AppResult<T> = Result<T, AppError>;
