//! JSON error responses for the news proxy.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::domain::error::FinsightError;

/// Body the proxy returns for any upstream failure.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch data";

#[derive(Debug)]
pub struct WebError {
    pub status: StatusCode,
    pub message: String,
}

impl WebError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, message)
    }
}

/// Upstream statuses are passed through; other network failures are a bad gateway.
pub fn status_from_error(err: &FinsightError) -> StatusCode {
    match err {
        FinsightError::Upstream { status, .. } => {
            StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
        }
        e if e.is_network() => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<FinsightError> for WebError {
    fn from(err: FinsightError) -> Self {
        Self::new(status_from_error(&err), FETCH_FAILED_MESSAGE)
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
