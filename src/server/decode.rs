//! Request body decoding.
//!
//! Bodies are decoded into the resource payloads [`LinkCreate`] and
//! [`UserCreate`]. Decoding is purely structural: required fields must be
//! present with the right JSON type, unknown fields are ignored, and no value
//! is trimmed, defaulted or validated.

use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{header, request::Parts, HeaderMap, StatusCode},
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::backend::{CreateLinkRequest, CreateUserRequest};
use crate::error::DecodeError;

// =============================================================================
// Resource Payloads
// =============================================================================

/// Body of `POST /links`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkCreate {
    pub id: String,
    pub title: String,
    pub url: String,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub user_id: String,
}

impl From<LinkCreate> for CreateLinkRequest {
    fn from(link: LinkCreate) -> Self {
        Self {
            id: link.id,
            title: link.title,
            url: link.url,
            images: link.images,
            tags: link.tags,
            user_id: link.user_id,
        }
    }
}

/// Body of `POST /users`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCreate {
    pub id: String,
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for UserCreate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserCreate")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl From<UserCreate> for CreateUserRequest {
    fn from(user: UserCreate) -> Self {
        Self {
            id: user.id,
            username: user.username,
            password: user.password,
        }
    }
}

// =============================================================================
// Decoding
// =============================================================================

/// Decode a JSON body, checking the Content-Type header first.
///
/// A missing Content-Type is accepted; a present one must be
/// `application/json` or a `+json` suffix type.
pub fn decode_json<T: DeserializeOwned>(
    headers: &HeaderMap,
    body: &[u8],
) -> Result<T, DecodeError> {
    if let Some(content_type) = headers.get(header::CONTENT_TYPE) {
        let content_type = content_type
            .to_str()
            .map_err(|_| DecodeError::UnsupportedMediaType("<non-ascii>".to_string()))?;
        if !is_json_content_type(content_type) {
            return Err(DecodeError::UnsupportedMediaType(content_type.to_string()));
        }
    }

    serde_json::from_slice(body).map_err(|e| DecodeError::InvalidBody(e.to_string()))
}

fn is_json_content_type(value: &str) -> bool {
    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == "application/json"
        || (essence.starts_with("application/") && essence.ends_with("+json"))
}

/// Axum extractor that decodes the request body with [`decode_json`].
///
/// Rejects with [`DecodeError`], so a malformed body never reaches a handler.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = DecodeError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let headers = req.headers().clone();
        let body = Bytes::from_request(req, state).await.map_err(|rejection| {
            if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                DecodeError::PayloadTooLarge(rejection.body_text())
            } else {
                DecodeError::Read(rejection.body_text())
            }
        })?;

        decode_json(&headers, &body).map(JsonBody)
    }
}

/// Axum extractor for the single `{id}` path segment.
///
/// Rejects with [`DecodeError::InvalidPath`] so a bad id gets the same JSON
/// error body as every other failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathId(pub String);

impl<S> FromRequestParts<S> for PathId
where
    S: Send + Sync,
{
    type Rejection = DecodeError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| DecodeError::InvalidPath(rejection.body_text()))?;
        Ok(PathId(id))
    }
}
