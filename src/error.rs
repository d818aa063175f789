use thiserror::Error;

/// Errors reported by a backend RPC call.
///
/// Variants follow the status codes used by the backend services, so a
/// failure is classified exactly once, where it leaves the client, and the
/// HTTP layer only has to map the variant to a status code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The referenced resource does not exist (e.g. delete of an unknown id)
    #[error("Not found: {0}")]
    NotFound(String),

    /// A resource with the same identifier already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// The backend rejected the payload
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The backend refused the call given the current resource state
    #[error("Failed precondition: {0}")]
    FailedPrecondition(String),

    /// The backend could not be reached or refused the connection
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// The call did not complete before its deadline
    #[error("Deadline exceeded: {0}")]
    DeadlineExceeded(String),

    /// The call was cancelled before the backend answered
    #[error("Call cancelled")]
    Cancelled,

    /// The backend answered with something that is not a valid RPC reply
    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),

    /// Any other failure, including codes the gateway does not recognise
    #[error("Internal backend error: {0}")]
    Internal(String),
}

impl BackendError {
    /// Build an error from a backend status code name and message.
    ///
    /// Accepts both `NOT_FOUND` and `not_found` spellings. Unknown codes are
    /// classified as [`BackendError::Internal`].
    pub fn from_code(code: &str, message: impl Into<String>) -> Self {
        let message = message.into();
        match code.to_ascii_uppercase().as_str() {
            "NOT_FOUND" => BackendError::NotFound(message),
            "ALREADY_EXISTS" => BackendError::AlreadyExists(message),
            "INVALID_ARGUMENT" | "OUT_OF_RANGE" => BackendError::InvalidArgument(message),
            "FAILED_PRECONDITION" | "ABORTED" => BackendError::FailedPrecondition(message),
            "UNAVAILABLE" | "RESOURCE_EXHAUSTED" => BackendError::Unavailable(message),
            "DEADLINE_EXCEEDED" => BackendError::DeadlineExceeded(message),
            "CANCELLED" => BackendError::Cancelled,
            _ => BackendError::Internal(message),
        }
    }

    /// Whether the failure is caused by the request rather than the backend.
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            BackendError::NotFound(_)
                | BackendError::AlreadyExists(_)
                | BackendError::InvalidArgument(_)
                | BackendError::FailedPrecondition(_)
        )
    }
}

/// Errors produced while decoding an inbound request body.
///
/// A decode error is detected before any backend call is made.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Content-Type is present but is not JSON
    #[error("Unsupported content type: {0} (expected application/json)")]
    UnsupportedMediaType(String),

    /// Body is not valid JSON or does not match the expected payload
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// Body exceeds the configured size limit
    #[error("Request body too large: {0}")]
    PayloadTooLarge(String),

    /// Body could not be read from the connection
    #[error("Failed to read request body: {0}")]
    Read(String),

    /// A path parameter could not be extracted (e.g. invalid percent-encoding)
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}
