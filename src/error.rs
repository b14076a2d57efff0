//! Error types shared by the product service and the gateway
//!
//! Library code returns `thiserror` enums; HTTP handlers convert them into
//! [`AppError`], which renders as `{"error": "..."}` with the matching status.

use thiserror::Error;

/// Failures reading or writing a JSON document on disk
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Store lock poisoned")]
    LockPoisoned,
}

// ============================================================================
// HTTP error responses
// ============================================================================

#[cfg(feature = "api")]
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};

#[cfg(feature = "api")]
use crate::json_store::UpdateError;

#[cfg(feature = "api")]
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(String),
    /// An upstream service failed; `details` carries the underlying reason
    Upstream { message: String, details: String },
}

#[cfg(feature = "api")]
impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        AppError::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        AppError::Internal(message.into())
    }
}

#[cfg(feature = "api")]
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, serde_json::json!({ "error": msg }))
            }
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, serde_json::json!({ "error": msg }))
            }
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, serde_json::json!({ "error": msg }))
            }
            AppError::Upstream { message, details } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                serde_json::json!({ "error": message, "details": details }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

#[cfg(feature = "api")]
impl<E: Into<AppError>> UpdateError<E> {
    /// Map a failed store update to a response; write failures become a 500
    /// carrying `write_failure` as the message
    pub fn into_app_error(self, write_failure: &str) -> AppError {
        match self {
            UpdateError::Rejected(e) => e.into(),
            UpdateError::Store(_) => AppError::internal(write_failure),
        }
    }
}
