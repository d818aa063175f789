//! Router configuration for the gateway.
//!
//! This module defines the HTTP routes and applies middleware for CORS,
//! request tracing and body size limits.
//!
//! # Route Structure
//!
//! ```text
//! /health              GET     - Health check
//! /links               POST    - Create link    -> LinksClient::create_link
//! /links/{id}          DELETE  - Delete link    -> LinksClient::delete_link
//! /users               POST    - Create user    -> UsersClient::create_user
//! /users/{id}          DELETE  - Delete user    -> UsersClient::delete_user
//! ```
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use apigw::backend::InMemoryBackend;
//! use apigw::server::routes::{create_router, RouterConfig};
//!
//! let backend = Arc::new(InMemoryBackend::new());
//! let router = create_router(backend.clone(), backend, RouterConfig::default());
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
//! axum::serve(listener, router).await?;
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use http::header::CONTENT_TYPE;
use http::{HeaderName, Method};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::health::health_handler;
use super::links::{create_link_handler, delete_link_handler, LinksHandler};
use super::users::{create_user_handler, delete_user_handler, UsersHandler};
use crate::backend::{LinksClient, UsersClient, REQUEST_ID_HEADER};

/// Default maximum request body size (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

// =============================================================================
// Router Configuration
// =============================================================================

/// Configuration for the HTTP router.
#[derive(Debug, Clone)]
pub struct RouterConfig {
    /// Allowed CORS origins (None = allow any origin)
    pub cors_origins: Option<Vec<String>>,

    /// Whether to enable request tracing
    pub enable_tracing: bool,

    /// Maximum accepted request body size in bytes
    pub max_body_bytes: usize,

    /// Deadline for each backend call (None = no deadline)
    pub backend_timeout: Option<Duration>,
}

impl Default for RouterConfig {
    /// By default:
    /// - CORS allows any origin
    /// - Tracing is enabled
    /// - Bodies are limited to 1 MiB
    /// - Backend calls have no deadline
    fn default() -> Self {
        Self {
            cors_origins: None,
            enable_tracing: true,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            backend_timeout: None,
        }
    }
}

impl RouterConfig {
    /// Set specific allowed CORS origins.
    ///
    /// Pass an empty vec to disallow all cross-origin requests.
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = Some(origins);
        self
    }

    /// Allow any CORS origin.
    pub fn with_cors_any_origin(mut self) -> Self {
        self.cors_origins = None;
        self
    }

    /// Enable or disable request tracing.
    pub fn with_tracing(mut self, enabled: bool) -> Self {
        self.enable_tracing = enabled;
        self
    }

    /// Set the maximum request body size.
    pub fn with_max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = bytes;
        self
    }

    /// Set the deadline applied to every backend call.
    pub fn with_backend_timeout(mut self, timeout: Duration) -> Self {
        self.backend_timeout = Some(timeout);
        self
    }
}

// =============================================================================
// Router Builder
// =============================================================================

/// Create the gateway router.
///
/// Each resource gets its own sub-router closed over its handler, so the
/// links routes only ever see the links client and vice versa.
pub fn create_router<L, U>(links: Arc<L>, users: Arc<U>, config: RouterConfig) -> Router
where
    L: LinksClient + 'static,
    U: UsersClient + 'static,
{
    let links_handler = LinksHandler::new(links).with_call_timeout(config.backend_timeout);
    let users_handler = UsersHandler::new(users).with_call_timeout(config.backend_timeout);

    let links_routes = Router::new()
        .route("/links", post(create_link_handler::<L>))
        .route("/links/{id}", delete(delete_link_handler::<L>))
        .with_state(links_handler);

    let users_routes = Router::new()
        .route("/users", post(create_user_handler::<U>))
        .route("/users/{id}", delete(delete_user_handler::<U>))
        .with_state(users_handler);

    let router = Router::new()
        .route("/health", get(health_handler))
        .merge(links_routes)
        .merge(users_routes)
        .layer(DefaultBodyLimit::max(config.max_body_bytes))
        .layer(build_cors_layer(&config));

    if config.enable_tracing {
        router.layer(TraceLayer::new_for_http())
    } else {
        router
    }
}

/// Build the CORS layer based on configuration.
fn build_cors_layer(config: &RouterConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(REQUEST_ID_HEADER)])
        .max_age(Duration::from_secs(86400)); // 24 hours

    match &config.cors_origins {
        None => cors.allow_origin(Any),
        Some(origins) if origins.is_empty() => cors,
        Some(origins) => {
            let parsed_origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
            cors.allow_origin(parsed_origins)
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
