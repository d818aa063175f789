//! JSON-over-HTTP backend client.
//!
//! Each unary call is sent as `POST {base_url}/{Service}/{Method}` with the
//! request message as a JSON body. Any 2xx answer is an empty
//! acknowledgement. Failures carry an optional status body
//! `{"code": "NOT_FOUND", "message": "..."}`; when it is missing, the HTTP
//! status alone decides the classification.

use std::time::Duration;

use async_trait::async_trait;
use http::StatusCode;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use url::Url;

use super::{
    CallContext, CallResult, CreateLinkRequest, CreateUserRequest, DeleteLinkRequest,
    DeleteUserRequest, Empty, LinksClient, UsersClient, REQUEST_ID_HEADER,
};
use crate::error::BackendError;

const CREATE_LINK: &str = "LinkService/CreateLink";
const DELETE_LINK: &str = "LinkService/DeleteLink";
const CREATE_USER: &str = "UserService/CreateUser";
const DELETE_USER: &str = "UserService/DeleteUser";

/// Bytes of a failed call's body read before the rest is discarded.
pub const MAX_ERROR_BODY_BYTES: usize = 4 * 1024;

/// Characters of backend failure text surfaced to callers.
pub const MAX_ERROR_MESSAGE_CHARS: usize = 256;

/// Error body returned by a backend service on failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcStatus {
    /// Status code name (e.g. `NOT_FOUND`)
    pub code: String,

    /// Human-readable message
    #[serde(default)]
    pub message: String,
}

/// HTTP implementation of [`LinksClient`] and [`UsersClient`].
///
/// One client talks to one backend service; the gateway builds a separate
/// instance for the link service and the user service.
#[derive(Clone)]
pub struct HttpBackendClient {
    client: Client,
    base_url: Url,
}

impl HttpBackendClient {
    /// Create a client for the service rooted at `base_url`.
    ///
    /// `connect_timeout` bounds connection establishment only; call
    /// deadlines come from the [`CallContext`].
    pub fn new(base_url: Url, connect_timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().connect_timeout(connect_timeout).build()?;
        Ok(Self::with_client(client, base_url))
    }

    /// Create a client from an existing reqwest client.
    pub fn with_client(client: Client, mut base_url: Url) -> Self {
        // Url::join replaces the last path segment unless the base ends in '/'
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self { client, base_url }
    }

    /// Base URL of the backend service.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Check that the backend answers HTTP at all.
    ///
    /// Any response, whatever its status, counts as reachable. The error
    /// keeps the transport detail since it is only shown to the operator.
    pub async fn probe(&self) -> Result<StatusCode, BackendError> {
        let response = self
            .client
            .get(self.base_url.clone())
            .send()
            .await
            .map_err(|e| BackendError::Unavailable(e.to_string()))?;
        Ok(response.status())
    }

    async fn call<T: Serialize + ?Sized>(
        &self,
        ctx: &CallContext,
        method: &str,
        payload: &T,
    ) -> CallResult {
        let url = self
            .base_url
            .join(method)
            .map_err(|e| BackendError::Internal(format!("invalid method path {}: {}", method, e)))?;

        let mut request = self.client.post(url).json(payload);
        if let Some(request_id) = ctx.request_id() {
            request = request.header(REQUEST_ID_HEADER, request_id);
        }
        if let Some(timeout) = ctx.timeout() {
            request = request.timeout(timeout);
        }

        let mut response = request
            .send()
            .await
            .map_err(|e| classify_transport_error(method, e))?;
        let status = response.status();

        debug!(
            method = method,
            status = status.as_u16(),
            request_id = ctx.request_id().unwrap_or("-"),
            "Backend call completed"
        );

        if status.is_success() {
            return Ok(Empty {});
        }

        let body = read_bounded(&mut response, MAX_ERROR_BODY_BYTES)
            .await
            .map_err(|e| classify_transport_error(method, e))?;
        Err(classify_rpc_failure(status, &body))
    }
}

/// Read at most `limit` bytes of a response body.
///
/// The remainder is never buffered; it is dropped with the response.
async fn read_bounded(
    response: &mut reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, reqwest::Error> {
    let mut body = Vec::new();
    while body.len() < limit {
        match response.chunk().await? {
            Some(chunk) => {
                let take = chunk.len().min(limit - body.len());
                body.extend_from_slice(&chunk[..take]);
            }
            None => break,
        }
    }
    Ok(body)
}

#[async_trait]
impl LinksClient for HttpBackendClient {
    async fn create_link(&self, ctx: &CallContext, request: CreateLinkRequest) -> CallResult {
        self.call(ctx, CREATE_LINK, &request).await
    }

    async fn delete_link(&self, ctx: &CallContext, request: DeleteLinkRequest) -> CallResult {
        self.call(ctx, DELETE_LINK, &request).await
    }
}

#[async_trait]
impl UsersClient for HttpBackendClient {
    async fn create_user(&self, ctx: &CallContext, request: CreateUserRequest) -> CallResult {
        self.call(ctx, CREATE_USER, &request).await
    }

    async fn delete_user(&self, ctx: &CallContext, request: DeleteUserRequest) -> CallResult {
        self.call(ctx, DELETE_USER, &request).await
    }
}

// =============================================================================
// Error Classification
// =============================================================================

/// Classify a non-2xx backend answer.
///
/// A well-formed [`RpcStatus`] body wins; otherwise the HTTP status is used.
pub fn classify_rpc_failure(status: StatusCode, body: &[u8]) -> BackendError {
    if let Ok(rpc) = serde_json::from_slice::<RpcStatus>(body) {
        if !rpc.code.is_empty() {
            return BackendError::from_code(&rpc.code, truncate_message(&rpc.message));
        }
    }

    let message = truncate_message(String::from_utf8_lossy(body).trim());
    let message = if message.is_empty() {
        status.to_string()
    } else {
        message
    };

    match status.as_u16() {
        400 | 422 => BackendError::InvalidArgument(message),
        404 => BackendError::NotFound(message),
        409 => BackendError::AlreadyExists(message),
        412 => BackendError::FailedPrecondition(message),
        408 | 504 => BackendError::DeadlineExceeded(message),
        499 => BackendError::Cancelled,
        502 | 503 | 429 => BackendError::Unavailable(message),
        500..=599 => BackendError::Internal(message),
        _ => BackendError::InvalidResponse(format!("unexpected status {}: {}", status, message)),
    }
}

fn truncate_message(message: &str) -> String {
    match message.char_indices().nth(MAX_ERROR_MESSAGE_CHARS) {
        Some((end, _)) => format!("{}...", &message[..end]),
        None => message.to_string(),
    }
}

/// Classify a failure below the RPC layer.
///
/// reqwest errors name the backend URL, so the detail is logged here and the
/// caller only sees a fixed message.
fn classify_transport_error(method: &str, err: reqwest::Error) -> BackendError {
    error!(method = method, error = %err, "Backend transport error");

    let service = method.split('/').next().unwrap_or(method);
    if err.is_timeout() {
        BackendError::DeadlineExceeded(format!("{} call timed out", service))
    } else if err.is_decode() || err.is_body() {
        BackendError::InvalidResponse(format!("{} sent an unreadable response", service))
    } else {
        // Connection refused, DNS failures and resets all look the same to the caller
        BackendError::Unavailable(format!("{} unreachable", service))
    }
}
