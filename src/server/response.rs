//! Translation of call outcomes into HTTP responses.
//!
//! Success maps to the status chosen by the handler (201 for create, 204 for
//! delete) with an empty body. Failures map to a status plus a JSON
//! [`ErrorResponse`] whose `error` field is a stable machine-readable reason.
//!
//! | Failure                              | Status | `error`                  |
//! |--------------------------------------|--------|--------------------------|
//! | malformed body                       | 400    | `invalid_body`           |
//! | non-JSON content type                | 415    | `unsupported_media_type` |
//! | body over the size limit             | 413    | `payload_too_large`      |
//! | backend `NotFound`                   | 404    | `not_found`              |
//! | backend `AlreadyExists`              | 409    | `already_exists`         |
//! | backend `InvalidArgument`            | 400    | `invalid_argument`       |
//! | backend `FailedPrecondition`         | 409    | `failed_precondition`    |
//! | backend `Unavailable`                | 503    | `backend_unavailable`    |
//! | backend reply not understood         | 502    | `bad_gateway`            |
//! | backend `DeadlineExceeded`           | 504    | `deadline_exceeded`      |
//! | backend `Cancelled`                  | 499    | (no body)                |
//! | anything else                        | 500    | `internal`               |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::backend::CallResult;
use crate::error::{BackendError, DecodeError};

/// Non-standard status used when the caller went away before the backend
/// answered (nginx "Client Closed Request").
pub const CLIENT_CLOSED_REQUEST: u16 = 499;

// =============================================================================
// Response Types
// =============================================================================

/// JSON error response returned for all error conditions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error type identifier (e.g., "not_found", "invalid_body")
    pub error: String,

    /// Human-readable error message
    pub message: String,

    /// HTTP status code (included for convenience)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
}

impl ErrorResponse {
    /// Create a new error response.
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Create a new error response with status code.
    pub fn with_status(
        error: impl Into<String>,
        message: impl Into<String>,
        status: StatusCode,
    ) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }
}

// =============================================================================
// Classification
// =============================================================================

/// Status code and reason for a backend failure.
pub fn classify_backend_error(err: &BackendError) -> (StatusCode, &'static str) {
    match err {
        BackendError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
        BackendError::AlreadyExists(_) => (StatusCode::CONFLICT, "already_exists"),
        BackendError::InvalidArgument(_) => (StatusCode::BAD_REQUEST, "invalid_argument"),
        BackendError::FailedPrecondition(_) => (StatusCode::CONFLICT, "failed_precondition"),
        BackendError::Unavailable(_) => (StatusCode::SERVICE_UNAVAILABLE, "backend_unavailable"),
        BackendError::InvalidResponse(_) => (StatusCode::BAD_GATEWAY, "bad_gateway"),
        BackendError::DeadlineExceeded(_) => (StatusCode::GATEWAY_TIMEOUT, "deadline_exceeded"),
        BackendError::Cancelled => (client_closed_request(), "cancelled"),
        BackendError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal"),
    }
}

/// Status code and reason for a decode failure.
pub fn classify_decode_error(err: &DecodeError) -> (StatusCode, &'static str) {
    match err {
        DecodeError::UnsupportedMediaType(_) => {
            (StatusCode::UNSUPPORTED_MEDIA_TYPE, "unsupported_media_type")
        }
        DecodeError::InvalidBody(_) => (StatusCode::BAD_REQUEST, "invalid_body"),
        DecodeError::PayloadTooLarge(_) => (StatusCode::PAYLOAD_TOO_LARGE, "payload_too_large"),
        DecodeError::Read(_) => (StatusCode::BAD_REQUEST, "invalid_body"),
        DecodeError::InvalidPath(_) => (StatusCode::BAD_REQUEST, "invalid_path"),
    }
}

fn client_closed_request() -> StatusCode {
    StatusCode::from_u16(CLIENT_CLOSED_REQUEST).unwrap_or(StatusCode::BAD_REQUEST)
}

/// Translate a backend call outcome into a response.
///
/// `success` is the status written when the call succeeded.
pub fn translate(outcome: CallResult, success: StatusCode) -> Response {
    match outcome {
        Ok(_) => success.into_response(),
        Err(err) => err.into_response(),
    }
}

// =============================================================================
// Error Mapping
// =============================================================================

/// Convert BackendError to HTTP response.
///
/// This implementation logs errors appropriately based on their severity:
/// - 5xx errors are logged at ERROR level
/// - 404 is logged at DEBUG level, other 4xx at WARN level
impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let (status, error_type) = classify_backend_error(&self);

        if let BackendError::Cancelled = self {
            debug!(status = status.as_u16(), "Backend call cancelled");
            return status.into_response();
        }

        let message = self.to_string();
        log_failure(status, error_type, &message);

        let error_response = ErrorResponse::with_status(error_type, message, status);
        (status, Json(error_response)).into_response()
    }
}

/// Convert DecodeError to HTTP response.
///
/// Decode errors are always client errors and never reach the backend.
impl IntoResponse for DecodeError {
    fn into_response(self) -> Response {
        let (status, error_type) = classify_decode_error(&self);
        let message = self.to_string();

        warn!(
            error_type = error_type,
            status = status.as_u16(),
            "Rejected request: {}",
            message
        );

        let error_response = ErrorResponse::with_status(error_type, message, status);
        (status, Json(error_response)).into_response()
    }
}

fn log_failure(status: StatusCode, error_type: &str, message: &str) {
    if status.is_server_error() {
        error!(
            error_type = error_type,
            status = status.as_u16(),
            "Backend error: {}",
            message
        );
    } else if status == StatusCode::NOT_FOUND {
        debug!(
            error_type = error_type,
            status = status.as_u16(),
            "Resource not found: {}",
            message
        );
    } else {
        warn!(
            error_type = error_type,
            status = status.as_u16(),
            "Client error: {}",
            message
        );
    }
}
