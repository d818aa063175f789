//! Configuration management for the gateway.
//!
//! Configuration comes from command-line arguments via clap, with every
//! option also settable through an `APIGW_` environment variable.
//!
//! # Environment Variables
//!
//! - `APIGW_HOST` - Server bind address (default: 0.0.0.0)
//! - `APIGW_PORT` - Server port (default: 8080)
//! - `APIGW_BACKEND` - Backend kind, `http` or `memory` (default: http)
//! - `APIGW_LINKS_URL` - Base URL of the link service (required for `http`)
//! - `APIGW_USERS_URL` - Base URL of the user service (required for `http`)
//! - `APIGW_BACKEND_TIMEOUT` - Per-call deadline in seconds, 0 disables (default: 10)
//! - `APIGW_CONNECT_TIMEOUT` - Backend connect timeout in seconds (default: 3)
//! - `APIGW_MAX_BODY_BYTES` - Maximum request body size (default: 1 MiB)
//! - `APIGW_CORS_ORIGINS` - Allowed CORS origins, comma-separated

use std::time::Duration;

use clap::{Args, Parser, Subcommand, ValueEnum};
use url::Url;

use crate::server::DEFAULT_MAX_BODY_BYTES;

// =============================================================================
// Default Values
// =============================================================================

/// Default server host.
pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Default server port.
pub const DEFAULT_PORT: u16 = 8080;

/// Default per-call backend deadline in seconds.
pub const DEFAULT_BACKEND_TIMEOUT_SECS: u64 = 10;

/// Default backend connect timeout in seconds.
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 3;

// =============================================================================
// CLI Arguments
// =============================================================================

/// apigw - JSON/HTTP gateway for the link and user services.
#[derive(Parser, Debug, Clone)]
#[command(name = "apigw")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn into_command(self) -> Command {
        self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Start the HTTP gateway.
    Serve(ServeConfig),

    /// Check configuration and backend reachability, then exit.
    Check(CheckConfig),
}

/// Which backend implementation the gateway forwards to.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// JSON-over-HTTP RPC services
    Http,
    /// Process-local store, for development
    Memory,
}

/// Backend service locations shared by `serve` and `check`.
#[derive(Args, Debug, Clone)]
pub struct BackendUrls {
    /// Base URL of the link service.
    #[arg(long, env = "APIGW_LINKS_URL")]
    pub links_url: Option<String>,

    /// Base URL of the user service.
    #[arg(long, env = "APIGW_USERS_URL")]
    pub users_url: Option<String>,

    /// Backend connect timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_CONNECT_TIMEOUT_SECS, env = "APIGW_CONNECT_TIMEOUT")]
    pub connect_timeout: u64,
}

impl BackendUrls {
    /// Parse both URLs, failing if either is missing or not http(s).
    pub fn resolve(&self) -> Result<(Url, Url), String> {
        let links = parse_backend_url("links", self.links_url.as_deref())?;
        let users = parse_backend_url("users", self.users_url.as_deref())?;
        Ok((links, users))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }
}

fn parse_backend_url(name: &str, value: Option<&str>) -> Result<Url, String> {
    let value = value.filter(|v| !v.is_empty()).ok_or_else(|| {
        format!(
            "The {name} service URL is required. Set --{name}-url or APIGW_{}_URL",
            name.to_uppercase()
        )
    })?;

    let url = Url::parse(value).map_err(|e| format!("Invalid {name} service URL '{value}': {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(format!(
            "Invalid {name} service URL '{value}': unsupported scheme '{scheme}'"
        )),
    }
}

/// Options for `apigw serve`.
#[derive(Args, Debug, Clone)]
pub struct ServeConfig {
    // =========================================================================
    // Server Configuration
    // =========================================================================
    /// Host address to bind the server to.
    #[arg(long, default_value = DEFAULT_HOST, env = "APIGW_HOST")]
    pub host: String,

    /// Port to listen on.
    #[arg(short, long, default_value_t = DEFAULT_PORT, env = "APIGW_PORT")]
    pub port: u16,

    /// Maximum accepted request body size in bytes.
    #[arg(long, default_value_t = DEFAULT_MAX_BODY_BYTES, env = "APIGW_MAX_BODY_BYTES")]
    pub max_body_bytes: usize,

    // =========================================================================
    // Backend Configuration
    // =========================================================================
    /// Backend implementation to forward requests to.
    #[arg(long, value_enum, default_value_t = BackendKind::Http, env = "APIGW_BACKEND")]
    pub backend: BackendKind,

    #[command(flatten)]
    pub urls: BackendUrls,

    /// Deadline for each backend call in seconds (0 = no deadline).
    #[arg(long, default_value_t = DEFAULT_BACKEND_TIMEOUT_SECS, env = "APIGW_BACKEND_TIMEOUT")]
    pub backend_timeout: u64,

    // =========================================================================
    // CORS Configuration
    // =========================================================================
    /// Allowed CORS origins (comma-separated).
    ///
    /// If not specified, allows any origin.
    #[arg(long, env = "APIGW_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,

    // =========================================================================
    // Logging Configuration
    // =========================================================================
    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,

    /// Disable request tracing.
    #[arg(long, default_value_t = false)]
    pub no_tracing: bool,
}

impl ServeConfig {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.backend == BackendKind::Http {
            self.urls.resolve()?;
        }

        if self.max_body_bytes == 0 {
            return Err("max_body_bytes must be greater than 0".to_string());
        }

        Ok(())
    }

    /// Get the server bind address as "host:port".
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Per-call backend deadline, or None when disabled.
    pub fn backend_timeout(&self) -> Option<Duration> {
        match self.backend_timeout {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}

/// Options for `apigw check`.
#[derive(Args, Debug, Clone)]
pub struct CheckConfig {
    #[command(flatten)]
    pub urls: BackendUrls,

    /// Enable verbose logging.
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

// =============================================================================
// Tests
// =============================================================================
