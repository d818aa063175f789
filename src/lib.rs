//! # apigw
//!
//! A JSON/HTTP gateway for two resources, links and users.
//!
//! Every request is translated into a unary call on a backend RPC service,
//! and the call outcome is translated back into an HTTP status. The gateway
//! holds no resource state and performs no validation beyond decoding the
//! request body.
//!
//! ## Architecture
//!
//! - [`backend`] - Capability traits for the link and user services, the
//!   call payloads, and the HTTP and in-memory implementations
//! - [`server`] - Body decoding, resource handlers, status translation and
//!   the Axum router
//! - [`config`] - CLI and configuration types
//! - [`error`] - Backend and decode error types
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use apigw::{create_router, InMemoryBackend, RouterConfig};
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = Arc::new(InMemoryBackend::new());
//!     let router = create_router(backend.clone(), backend, RouterConfig::default());
//!
//!     let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await.unwrap();
//!     axum::serve(listener, router).await.unwrap();
//! }
//! ```

pub mod backend;
pub mod config;
pub mod error;
pub mod server;

// Re-export commonly used types
pub use backend::{
    CallContext, CallResult, CreateLinkRequest, CreateUserRequest, DeleteLinkRequest,
    DeleteUserRequest, Empty, HttpBackendClient, InMemoryBackend, LinksClient, UsersClient,
};
pub use config::{BackendKind, CheckConfig, Cli, Command, ServeConfig};
pub use error::{BackendError, DecodeError};
pub use server::{
    create_router, ErrorResponse, HealthResponse, LinkCreate, LinksHandler, RouterConfig,
    UserCreate, UsersHandler,
};
