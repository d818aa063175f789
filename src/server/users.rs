//! Users resource handler.
//!
//! Mirrors the links handler over [`UsersClient`]. The password is opaque:
//! it is forwarded exactly as decoded and never logged.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::Response,
};
use tracing::debug;

use super::decode::{JsonBody, PathId, UserCreate};
use super::response::translate;
use crate::backend::{CallContext, CallResult, CreateUserRequest, DeleteUserRequest, UsersClient};

/// Translates user requests into calls on a [`UsersClient`].
pub struct UsersHandler<C: UsersClient> {
    client: Arc<C>,
    call_timeout: Option<Duration>,
}

impl<C: UsersClient> UsersHandler<C> {
    pub fn new(client: Arc<C>) -> Self {
        Self {
            client,
            call_timeout: None,
        }
    }

    pub fn with_call_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.call_timeout = timeout;
        self
    }

    pub fn context(&self, headers: &HeaderMap) -> CallContext {
        CallContext::from_headers(headers).with_timeout(self.call_timeout)
    }

    /// Forward a decoded user to `CreateUser`.
    pub async fn create(&self, ctx: &CallContext, user: UserCreate) -> CallResult {
        let request = CreateUserRequest::from(user);
        debug!(user_id = %request.id, "Forwarding CreateUser");
        ctx.run(self.client.create_user(ctx, request)).await
    }

    /// Forward a path id to `DeleteUser`.
    pub async fn delete(&self, ctx: &CallContext, id: String) -> CallResult {
        debug!(user_id = %id, "Forwarding DeleteUser");
        ctx.run(self.client.delete_user(ctx, DeleteUserRequest::new(id))).await
    }
}

impl<C: UsersClient> Clone for UsersHandler<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            call_timeout: self.call_timeout,
        }
    }
}

/// `POST /users` - body `{"id", "username", "password"}`, 201 on success.
pub async fn create_user_handler<C: UsersClient>(
    State(handler): State<UsersHandler<C>>,
    headers: HeaderMap,
    JsonBody(user): JsonBody<UserCreate>,
) -> Response {
    let ctx = handler.context(&headers);
    translate(handler.create(&ctx, user).await, StatusCode::CREATED)
}

/// `DELETE /users/{id}` - 204 on success.
pub async fn delete_user_handler<C: UsersClient>(
    State(handler): State<UsersHandler<C>>,
    PathId(id): PathId,
    headers: HeaderMap,
) -> Response {
    let ctx = handler.context(&headers);
    translate(handler.delete(&ctx, id).await, StatusCode::NO_CONTENT)
}
