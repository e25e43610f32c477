//! API error envelope.
//!
//! Runtime failures surface to clients as a JSON envelope:
//! `{"error": {"code": 404, "title": "Not Found", "message": "..."}}`.
//! Backend internals are logged, never echoed to the client.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

use crate::backend::BackendError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("internal error")]
    Internal(#[source] BackendError),
}

impl From<BackendError> for ApiError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::TokenNotFound { .. } | BackendError::RoleNotFound { .. } => {
                ApiError::NotFound(err.to_string())
            }
            BackendError::Internal(_) => ApiError::Internal(err),
        }
    }
}

#[derive(Serialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    title: &'static str,
    message: String,
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            ApiError::NotFound(message) => message.clone(),
            ApiError::Internal(source) => {
                tracing::error!(error = %source, "Backend failure");
                "an internal error occurred".to_string()
            }
        };

        let envelope = ErrorEnvelope {
            error: ErrorBody {
                code: status.as_u16(),
                title: status.canonical_reason().unwrap_or("Error"),
                message,
            },
        };
        (status, Json(envelope)).into_response()
    }
}

/// Fallback for paths outside the registered table, so unknown routes get
/// the same envelope as unknown resources.
pub async fn not_found() -> Response {
    ApiError::NotFound("the requested resource could not be found".to_string()).into_response()
}
