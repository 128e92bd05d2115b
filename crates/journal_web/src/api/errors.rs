//! API error types mapped to HTTP status codes.
//!
//! Each [`ApiError`] variant maps to one status code and produces a JSON
//! response body `{"error": "message"}`.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use journal_core::JournalError;
use log::{error, warn};
use serde_json::json;

/// Application-level error type that implements `IntoResponse`.
///
/// - `NotFound` → 404
/// - `BadRequest` → 400
/// - `Internal` → 500
#[derive(Debug)]
pub enum ApiError {
    /// Requested entry is absent (404).
    NotFound(String),
    /// Malformed or invalid request input (400).
    BadRequest(String),
    /// Storage or runtime failure (500).
    Internal(String),
}

impl From<JournalError> for ApiError {
    fn from(value: JournalError) -> Self {
        match value {
            JournalError::NotFound => Self::NotFound(JournalError::NotFound.to_string()),
            JournalError::Storage(err) => Self::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::BadRequest(format!("invalid input: {}", value.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => {
                warn!("event=http_error module=api status=bad_request error={msg}");
                (StatusCode::BAD_REQUEST, msg)
            }
            ApiError::Internal(msg) => {
                error!("event=http_error module=api status=internal error={msg}");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };
        let body = axum::Json(json!({ "error": message }));
        (status, body).into_response()
    }
}
