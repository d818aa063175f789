//! HTTP server layer for the gateway.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         HTTP Layer                              │
//! │        POST /links  DELETE /links/{id}  POST /users  ...        │
//! │                                                                 │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────────┐  │
//! │  │   decode    │  │links / users│  │        response         │  │
//! │  │  (bodies)   │─▶│ (handlers)  │─▶│  (status translation)   │  │
//! │  └─────────────┘  └──────┬──────┘  └─────────────────────────┘  │
//! └──────────────────────────┼──────────────────────────────────────┘
//!                            ▼
//!                   backend client traits
//! ```

pub mod decode;
pub mod health;
pub mod links;
pub mod response;
pub mod routes;
pub mod users;

pub use decode::{decode_json, JsonBody, LinkCreate, PathId, UserCreate};
pub use health::{health_handler, HealthResponse};
pub use links::{create_link_handler, delete_link_handler, LinksHandler};
pub use response::{
    classify_backend_error, classify_decode_error, translate, ErrorResponse,
    CLIENT_CLOSED_REQUEST,
};
pub use routes::{create_router, RouterConfig, DEFAULT_MAX_BODY_BYTES};
pub use users::{create_user_handler, delete_user_handler, UsersHandler};
