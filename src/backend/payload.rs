//! Backend call payloads.
//!
//! Each request message mirrors the fields of the corresponding HTTP payload
//! one to one. Field names on the wire use the camelCase JSON mapping of the
//! backend messages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Empty acknowledgement returned by every successful call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Empty {}

/// `LinkService/CreateLink` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    pub id: String,
    pub title: String,
    pub url: String,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub user_id: String,
}

/// `LinkService/DeleteLink` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteLinkRequest {
    pub id: String,
}

impl DeleteLinkRequest {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

/// `UserService/CreateUser` request.
///
/// The password is opaque to the gateway and is redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub id: String,
    pub username: String,
    pub password: String,
}

impl fmt::Debug for CreateUserRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CreateUserRequest")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// `UserService/DeleteUser` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteUserRequest {
    pub id: String,
}

impl DeleteUserRequest {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}
