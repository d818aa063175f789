//! Backend client layer.
//!
//! The gateway owns no resource state. Every request is forwarded to a
//! backend service through one of the capability traits defined here:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │        LinksHandler / UsersHandler      │
//! └────────────────────┬────────────────────┘
//!                      │  CallContext + payload
//!                      ▼
//! ┌─────────────────────────────────────────┐
//! │     LinksClient / UsersClient traits    │
//! └────────────────────┬────────────────────┘
//!                      │
//!          ┌───────────┴───────────┐
//!          ▼                       ▼
//! ┌─────────────────┐    ┌─────────────────────┐
//! │HttpBackendClient│    │  InMemoryBackend    │
//! │ (JSON over HTTP)│    │  (development)      │
//! └─────────────────┘    └─────────────────────┘
//! ```
//!
//! Handlers are generic over the traits, so any implementation (including a
//! test double that records calls) can be substituted.

mod http_client;
mod memory;
mod payload;

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use axum::http::HeaderMap;

use crate::error::BackendError;

pub use http_client::{classify_rpc_failure, HttpBackendClient, RpcStatus};
pub use memory::InMemoryBackend;
pub use payload::{
    CreateLinkRequest, CreateUserRequest, DeleteLinkRequest, DeleteUserRequest, Empty,
};

/// Header carrying the caller's request id, forwarded to the backend.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Result of a unary backend call.
pub type CallResult = Result<Empty, BackendError>;

// =============================================================================
// Call Context
// =============================================================================

/// Per-call context derived from the inbound HTTP request.
///
/// Cancellation is carried by the call future itself: when the client
/// disconnects, the server drops the handler future and with it the
/// in-flight backend call.
#[derive(Debug, Clone, Default)]
pub struct CallContext {
    request_id: Option<String>,
    timeout: Option<Duration>,
}

impl CallContext {
    /// Create an empty context with no request id and no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a context from inbound request headers.
    ///
    /// Picks up `x-request-id` when it is present and valid UTF-8.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let request_id = headers
            .get(REQUEST_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .filter(|v| !v.is_empty())
            .map(|v| v.to_string());

        Self {
            request_id,
            timeout: None,
        }
    }

    /// Set the request id.
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }

    /// Bound the backend call by `timeout` (None = wait indefinitely).
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Request id of the originating HTTP request, if any.
    pub fn request_id(&self) -> Option<&str> {
        self.request_id.as_deref()
    }

    /// Deadline applied to the backend call, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Drive a backend call to completion, enforcing the context deadline.
    pub async fn run<F>(&self, call: F) -> CallResult
    where
        F: Future<Output = CallResult>,
    {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.unwrap_or_else(|_| {
                Err(BackendError::DeadlineExceeded(format!(
                    "backend did not answer within {}ms",
                    limit.as_millis()
                )))
            }),
            None => call.await,
        }
    }
}

// =============================================================================
// Capability Traits
// =============================================================================

/// Link storage capability consumed by the links handler.
#[async_trait]
pub trait LinksClient: Send + Sync {
    /// Create a link. Succeeds with an empty acknowledgement.
    async fn create_link(&self, ctx: &CallContext, request: CreateLinkRequest) -> CallResult;

    /// Delete the link with the given id.
    async fn delete_link(&self, ctx: &CallContext, request: DeleteLinkRequest) -> CallResult;
}

/// User storage capability consumed by the users handler.
#[async_trait]
pub trait UsersClient: Send + Sync {
    /// Create a user. Succeeds with an empty acknowledgement.
    async fn create_user(&self, ctx: &CallContext, request: CreateUserRequest) -> CallResult;

    /// Delete the user with the given id.
    async fn delete_user(&self, ctx: &CallContext, request: DeleteUserRequest) -> CallResult;
}
