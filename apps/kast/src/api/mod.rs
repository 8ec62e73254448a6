//! # KAST HTTP API Module
//!
//! This module implements the HTTP REST API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /status` - Step number and engine sizes
//! - `GET /knowledge/low` - Low-level knowledge values
//! - `GET /knowledge/high` - High-level knowledge values
//! - `GET /state` - Predicate state
//! - `GET /snapshot` - Everything above in one read
//! - `POST /frame` - Run one step over a JSON frame

mod handlers;
mod types;

// Re-export handlers and types for integration tests (via `kast::api::*`)
pub use handlers::{
    frame_handler, health_handler, high_knowledge_handler, low_knowledge_handler,
    snapshot_handler, state_handler, status_handler,
};
pub use types::{FrameResponse, HealthResponse, StatusResponse};

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{get, post},
};
use kast_core::{KastError, Runtime};
use std::sync::Arc;
use tokio::sync::RwLock;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

/// Maximum accepted request body (1 MB).
const MAX_BODY_SIZE: usize = 1024 * 1024;

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state containing the runtime.
#[derive(Clone)]
pub struct AppState {
    /// The runtime driving the spellbook. Steps take the write lock.
    pub runtime: Arc<RwLock<Runtime>>,
}

impl AppState {
    /// Create new app state with a runtime.
    #[must_use]
    pub fn new(runtime: Runtime) -> Self {
        Self {
            runtime: Arc::new(RwLock::new(runtime)),
        }
    }
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. Body limit - rejects oversized frames
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/status", get(handlers::status_handler))
        .route("/knowledge/low", get(handlers::low_knowledge_handler))
        .route("/knowledge/high", get(handlers::high_knowledge_handler))
        .route("/state", get(handlers::state_handler))
        .route("/snapshot", get(handlers::snapshot_handler))
        .route("/frame", post(handlers::frame_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(MAX_BODY_SIZE)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Start the HTTP server.
pub async fn run_server(addr: &str, runtime: Runtime) -> Result<(), KastError> {
    let router = create_router(AppState::new(runtime));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| KastError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("KAST HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| KastError::IoError(format!("Server error: {}", e)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
