//! HTTP Gateway
//!
//! Routes:
//! - `POST /process` (auth): pocket-to-pocket transfer
//! - `GET  /pocket` (auth): caller's balance
//! - `POST /register`, `POST /login`: account lifecycle
//! - `GET  /health`, `GET /api-docs/openapi.json`

pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;


use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tokio::net::TcpListener;

use crate::auth::auth_gate;
use crate::config::GatewayConfig;
use state::AppState;

/// Build the full router over shared state
pub fn build_router(state: Arc<AppState>) -> Router {
    // Protected by the auth gate
    let private_routes = Router::new()
        .route("/process", post(handlers::process_transfer))
        .route("/pocket", get(handlers::get_pocket))
        .layer(from_fn_with_state(state.clone(), auth_gate));

    let public_routes = Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/health", get(handlers::health_check));

    Router::new()
        .merge(private_routes)
        .merge(public_routes)
        .with_state(state)
        .route("/api-docs/openapi.json", get(openapi::openapi_json))
}

/// Bind and serve until ctrl-c
pub async fn run_server(config: &GatewayConfig, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr} (port may already be in use)"))?;

    tracing::info!("Gateway listening on http://{}", addr);
    tracing::info!("OpenAPI: http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install ctrl-c handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
