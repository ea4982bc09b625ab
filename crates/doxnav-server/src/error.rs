//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use doxnav_site::LibraryError;
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Unknown version or href, or a build that failed to load.
    #[error("{0}")]
    Library(#[from] LibraryError),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let Self::Library(err) = &self;
        let (status, body) = match err {
            LibraryError::VersionNotFound(label) => (
                StatusCode::NOT_FOUND,
                json!({"error": err.to_string(), "version": label}),
            ),
            LibraryError::HrefNotFound { href, .. } => (
                StatusCode::NOT_FOUND,
                json!({"error": err.to_string(), "href": href}),
            ),
            LibraryError::LoadFailed { version, .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": err.to_string(), "version": version}),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}
