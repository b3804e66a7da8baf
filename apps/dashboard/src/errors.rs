use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::backend_client::BackendError;

/// Failure of a workflow step, as the user sees it.
///
/// `Validation` never touched the network. `Transport` means the backend call
/// was attempted and did not complete successfully. Mixed upload results are
/// not errors; they travel in the batch summary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkflowError {
    #[error("{message}")]
    Validation {
        field: Option<&'static str>,
        message: String,
    },

    #[error("Request failed: {0}")]
    Transport(String),
}

impl WorkflowError {
    pub fn field(field: &'static str, message: impl Into<String>) -> Self {
        WorkflowError::Validation {
            field: Some(field),
            message: message.into(),
        }
    }

    #[cfg(test)]
    pub fn is_validation(&self) -> bool {
        matches!(self, WorkflowError::Validation { .. })
    }
}

impl From<BackendError> for WorkflowError {
    fn from(err: BackendError) -> Self {
        WorkflowError::Transport(err.to_string())
    }
}

/// Error type of the dashboard's own HTTP surface.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
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
