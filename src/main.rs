//! apigw - JSON/HTTP gateway for the link and user services.
//!
//! This binary parses the CLI, builds the backend clients and serves the
//! router.

use std::process::ExitCode;
use std::sync::Arc;

use axum::Router;
use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use apigw::{
    backend::{HttpBackendClient, InMemoryBackend},
    config::{BackendKind, CheckConfig, Cli, Command, ServeConfig},
    server::{create_router, RouterConfig},
};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.into_command() {
        Command::Serve(config) => run_serve(config).await,
        Command::Check(config) => run_check(config).await,
    }
}

// =============================================================================
// Serve Command
// =============================================================================

async fn run_serve(config: ServeConfig) -> ExitCode {
    init_logging(config.verbose);

    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        return ExitCode::FAILURE;
    }

    let router_config = build_router_config(&config);

    let router = match config.backend {
        BackendKind::Memory => {
            warn!("Using the in-memory backend; data is lost on restart");
            let backend = Arc::new(InMemoryBackend::new());
            create_router(Arc::clone(&backend), backend, router_config)
        }
        BackendKind::Http => match build_http_router(&config, router_config) {
            Ok(router) => router,
            Err(e) => {
                error!("Failed to create backend clients: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };

    let addr = config.bind_address();

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };

    info!(
        address = %addr,
        backend = ?config.backend,
        backend_timeout_secs = config.backend_timeout,
        "Gateway listening"
    );

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return ExitCode::FAILURE;
    }

    info!("Shutdown complete");
    ExitCode::SUCCESS
}

fn build_http_router(config: &ServeConfig, router_config: RouterConfig) -> Result<Router, String> {
    let (links_url, users_url) = config.urls.resolve()?;
    let connect_timeout = config.urls.connect_timeout();

    info!("  Link service: {}", links_url);
    info!("  User service: {}", users_url);

    let links = HttpBackendClient::new(links_url, connect_timeout).map_err(|e| e.to_string())?;
    let users = HttpBackendClient::new(users_url, connect_timeout).map_err(|e| e.to_string())?;

    Ok(create_router(Arc::new(links), Arc::new(users), router_config))
}

/// Build RouterConfig from the application ServeConfig.
fn build_router_config(config: &ServeConfig) -> RouterConfig {
    let mut router_config = RouterConfig::default()
        .with_max_body_bytes(config.max_body_bytes)
        .with_tracing(!config.no_tracing);

    if let Some(timeout) = config.backend_timeout() {
        router_config = router_config.with_backend_timeout(timeout);
    }

    if let Some(ref origins) = config.cors_origins {
        router_config = router_config.with_cors_origins(origins.clone());
    }

    router_config
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received");
}

/// Initialize the tracing/logging subsystem.
fn init_logging(verbose: bool) {
    let env_filter = if verbose {
        "apigw=debug,tower_http=debug"
    } else {
        "apigw=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| env_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

// =============================================================================
// Check Command
// =============================================================================

async fn run_check(config: CheckConfig) -> ExitCode {
    if config.verbose {
        init_logging(true);
    }

    println!("apigw Configuration Check");
    println!("═════════════════════════");
    println!();

    let (links_url, users_url) = match config.urls.resolve() {
        Ok(urls) => urls,
        Err(e) => {
            println!("✗ {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut healthy = true;
    for (name, url) in [("Link service", links_url), ("User service", users_url)] {
        print!("Probing {} at {}... ", name, url);

        let client = match HttpBackendClient::new(url, config.urls.connect_timeout()) {
            Ok(client) => client,
            Err(e) => {
                println!("✗ failed to build client: {}", e);
                healthy = false;
                continue;
            }
        };

        match client.probe().await {
            Ok(status) => println!("✓ reachable (HTTP {})", status.as_u16()),
            Err(e) => {
                println!("✗ {}", e);
                healthy = false;
            }
        }
    }

    println!();
    if healthy {
        println!("✓ All checks passed!");
        ExitCode::SUCCESS
    } else {
        println!("✗ Some backends are unreachable");
        ExitCode::FAILURE
    }
}
