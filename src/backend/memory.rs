//! In-memory backend for local development and tests.
//!
//! Implements both capability traits over two maps. It enforces the two
//! rules the real services report through their error codes: duplicate ids
//! are rejected on create and unknown ids are rejected on delete.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use super::{
    CallContext, CallResult, CreateLinkRequest, CreateUserRequest, DeleteLinkRequest,
    DeleteUserRequest, Empty, LinksClient, UsersClient,
};
use crate::error::BackendError;

/// Backend that keeps links and users in process memory.
#[derive(Default)]
pub struct InMemoryBackend {
    links: RwLock<HashMap<String, CreateLinkRequest>>,
    users: RwLock<HashMap<String, CreateUserRequest>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a stored link by id.
    pub async fn link(&self, id: &str) -> Option<CreateLinkRequest> {
        self.links.read().await.get(id).cloned()
    }

    /// Get a stored user by id.
    pub async fn user(&self, id: &str) -> Option<CreateUserRequest> {
        self.users.read().await.get(id).cloned()
    }

    pub async fn link_count(&self) -> usize {
        self.links.read().await.len()
    }

    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl LinksClient for InMemoryBackend {
    async fn create_link(&self, _ctx: &CallContext, request: CreateLinkRequest) -> CallResult {
        let mut links = self.links.write().await;
        if links.contains_key(&request.id) {
            return Err(BackendError::AlreadyExists(format!(
                "link {} already exists",
                request.id
            )));
        }
        debug!(link_id = %request.id, "Stored link");
        links.insert(request.id.clone(), request);
        Ok(Empty {})
    }

    async fn delete_link(&self, _ctx: &CallContext, request: DeleteLinkRequest) -> CallResult {
        match self.links.write().await.remove(&request.id) {
            Some(_) => Ok(Empty {}),
            None => Err(BackendError::NotFound(format!(
                "link {} not found",
                request.id
            ))),
        }
    }
}

#[async_trait]
impl UsersClient for InMemoryBackend {
    async fn create_user(&self, _ctx: &CallContext, request: CreateUserRequest) -> CallResult {
        let mut users = self.users.write().await;
        if users.contains_key(&request.id) {
            return Err(BackendError::AlreadyExists(format!(
                "user {} already exists",
                request.id
            )));
        }
        debug!(user_id = %request.id, "Stored user");
        users.insert(request.id.clone(), request);
        Ok(Empty {})
    }

    async fn delete_user(&self, _ctx: &CallContext, request: DeleteUserRequest) -> CallResult {
        match self.users.write().await.remove(&request.id) {
            Some(_) => Ok(Empty {}),
            None => Err(BackendError::NotFound(format!(
                "user {} not found",
                request.id
            ))),
        }
    }
}
