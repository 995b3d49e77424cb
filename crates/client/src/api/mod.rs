//! Classroom REST API client.
//!
//! Thin `reqwest` wrapper over the backend's JSON endpoints. Payloads are
//! passed through unchanged; the only interpretation done here is turning a
//! non-2xx response into [`ApiError::Backend`] with the server's `detail`.
//!
//! # Architecture
//!
//! - [`auth`] - `/token` login and `/signup`
//! - [`client`] - [`ClassroomClient`] with the assignment and submission endpoints
//!
//! Requests carry no timeout and are never retried. Every retry is a fresh
//! user action.

pub mod auth;
pub mod client;

pub use auth::{NewUser, RegisteredUser, TokenResponse};
pub use client::{ClassroomClient, FileUpload, SubmissionUpload};

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to the classroom backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never completed, or its body could not be read.
    #[error("HTTP error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Backend {
        /// HTTP status code.
        status: StatusCode,
        /// Human-readable `detail` message, when the backend sent one.
        detail: Option<String>,
    },
}

impl ApiError {
    /// The backend's own message, if it sent one.
    #[must_use]
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Backend { detail, .. } => detail.as_deref(),
            Self::Transport(_) => None,
        }
    }

    /// Whether the request failed before any answer arrived.
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

/// Error body returned by the backend.
///
/// `detail` is usually a string, but validation failures carry a list of
/// objects instead. Only the string form is shown to users.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

/// Pass a successful response through, or turn a failed one into
/// [`ApiError::Backend`].
pub(crate) async fn ensure_success(
    response: reqwest::Response,
) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let bytes = response.bytes().await?;
    let detail = parse_detail(&bytes);
    tracing::debug!(%status, detail = detail.as_deref(), "Backend rejected request");
    Err(ApiError::Backend { status, detail })
}

fn parse_detail(body: &[u8]) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_slice(body).ok()?;
    match parsed.detail? {
        serde_json::Value::String(message) if !message.is_empty() => Some(message),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_detail_string() {
        let body = br#"{"detail":"Incorrect username or password"}"#;
        assert_eq!(
            parse_detail(body).as_deref(),
            Some("Incorrect username or password")
        );
    }

    #[test]
    fn test_parse_detail_structured_is_ignored() {
        let body = br#"{"detail":[{"loc":["body","title"],"msg":"field required"}]}"#;
        assert_eq!(parse_detail(body), None);
    }

    #[test]
    fn test_parse_detail_missing_or_not_json() {
        assert_eq!(parse_detail(b"{}"), None);
        assert_eq!(parse_detail(b"<html>502</html>"), None);
        assert_eq!(parse_detail(br#"{"detail":""}"#), None);
    }

    #[test]
    fn test_backend_error_display() {
        let err = ApiError::Backend {
            status: StatusCode::BAD_REQUEST,
            detail: Some("Username already registered".to_string()),
        };
        assert_eq!(
            err.to_string(),
            "Backend returned 400 Bad Request: Username already registered"
        );
        assert_eq!(err.detail(), Some("Username already registered"));
        assert!(!err.is_transport());
    }

    #[test]
    fn test_backend_error_without_detail() {
        let err = ApiError::Backend {
            status: StatusCode::BAD_GATEWAY,
            detail: None,
        };
        assert_eq!(err.to_string(), "Backend returned 502 Bad Gateway: no detail");
        assert_eq!(err.detail(), None);
    }
}
