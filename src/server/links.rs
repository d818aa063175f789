//! Links resource handler.
//!
//! # Endpoints
//!
//! - `POST /links` - Create a link (201 on success)
//! - `DELETE /links/{id}` - Delete a link (204 on success)

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
};
use tracing::debug;

use super::decode::{JsonBody, LinkCreate, PathId};
use super::response::translate;
use crate::backend::{CallContext, CallResult, CreateLinkRequest, DeleteLinkRequest, LinksClient};

/// Translates link requests into calls on a [`LinksClient`].
///
/// Holds nothing but a shared reference to the client and the per-call
/// timeout, so one instance serves any number of concurrent requests.
pub struct LinksHandler<C: LinksClient> {
    client: Arc<C>,
    call_timeout: Option<Duration>,
}

impl<C: LinksClient> LinksHandler<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            call_timeout: None,
        }
    }

    /// Bound every backend call by `timeout`.
    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Build the call context for an inbound request.
    pub fn context(&self, headers: &HeaderMap) -> CallContext {
        CallContext::from_headers(headers).with_timeout(self.call_timeout)
    }

    /// Forward a decoded link to `CreateLink`.
    pub async fn create(&self, ctx: &CallContext, link: LinkCreate) -> CallResult {
        let request = CreateLinkRequest::from(link);
        debug!(link_id = %request.id, "Forwarding CreateLink");
        ctx.run(self.client.create_link(ctx, request)).await
    }

    /// Forward a path id to `DeleteLink`.
    pub async fn delete(&self, ctx: &CallContext, id: String) -> CallResult {
        debug!(link_id = %id, "Forwarding DeleteLink");
        ctx.run(self.client.delete_link(ctx, DeleteLinkRequest::new(id))).await
    }
}

impl<C: LinksClient> Clone for LinksHandler<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            call_timeout: self.call_timeout,
        }
    }
}

/// Handle link creation.
///
/// # Endpoint
///
/// `POST /links`
///
/// # Body
///
/// ```json
/// {
///   "id": "1",
///   "title": "Test",
///   "url": "http://test.com",
///   "images": ["test1", "test2"],
///   "tags": ["tag1", "tag2"],
///   "userId": "user1"
/// }
/// ```
///
/// # Response
///
/// - `201 Created`: Backend accepted the link
/// - `400 Bad Request`: Malformed body
/// - `415 Unsupported Media Type`: Body is not JSON
/// - other 4xx/5xx: Backend failure
pub async fn create_link_handler<C: LinksClient>(
    State(handler): State<LinksHandler<C>>,
    headers: HeaderMap,
    JsonBody(link): JsonBody<LinkCreate>,
) -> Response {
    let ctx = handler.context(&headers);
    translate(handler.create(&ctx, link).await, StatusCode::CREATED)
}

/// Handle link deletion.
///
/// # Endpoint
///
/// `DELETE /links/{id}`
///
/// # Response
///
/// - `204 No Content`: Backend deleted the link
/// - `400 Bad Request`: The id is not valid UTF-8 after percent-decoding
/// - `404 Not Found`: Backend does not know the id
/// - other 4xx/5xx: Backend failure
pub async fn delete_link_handler<C: LinksClient>(
    State(handler): State<LinksHandler<C>>,
    PathId(id): PathId,
    headers: HeaderMap,
) -> Response {
    let ctx = handler.context(&headers);
    translate(handler.delete(&ctx, id).await, StatusCode::NO_CONTENT)
}
