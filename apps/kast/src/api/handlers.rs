//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{FrameResponse, HealthResponse, StatusResponse},
};
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use kast_core::{Frame, KastError, primitives::check_frame_limits};

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// READ HANDLERS
// =============================================================================

/// Get engine status.
pub async fn status_handler(State(state): State<AppState>) -> impl IntoResponse {
    let runtime = state.runtime.read().await;
    let response = StatusResponse::from_spellbook(runtime.step(), runtime.spellbook());

    (StatusCode::OK, Json(response))
}

/// Current low-level knowledge values.
pub async fn low_knowledge_handler(State(state): State<AppState>) -> impl IntoResponse {
    let runtime = state.runtime.read().await;
    Json(runtime.spellbook().low_level_knowledge().snapshot())
}

/// Current high-level knowledge values.
pub async fn high_knowledge_handler(State(state): State<AppState>) -> impl IntoResponse {
    let runtime = state.runtime.read().await;
    Json(runtime.spellbook().high_level_knowledge().snapshot())
}

/// Current predicate state.
pub async fn state_handler(State(state): State<AppState>) -> impl IntoResponse {
    let runtime = state.runtime.read().await;
    Json(runtime.spellbook().state().clone())
}

/// Knowledge, state and step number in one consistent read.
pub async fn snapshot_handler(State(state): State<AppState>) -> impl IntoResponse {
    let runtime = state.runtime.read().await;
    Json(runtime.snapshot())
}

// =============================================================================
// FRAME HANDLER
// =============================================================================

/// Run one step over a posted low-level frame.
///
/// The write lock is held for the whole step, so readers never observe a
/// half-applied frame.
pub async fn frame_handler(
    State(state): State<AppState>,
    Json(frame): Json<Frame>,
) -> impl IntoResponse {
    if let Err(e) = check_frame_limits(frame.keys()) {
        return (
            StatusCode::BAD_REQUEST,
            Json(FrameResponse::error(format!("Invalid frame: {}", e))),
        );
    }

    let mut runtime = state.runtime.write().await;
    match runtime.run_step(&frame) {
        Ok(report) => (StatusCode::OK, Json(FrameResponse::success(report))),
        Err(e @ (KastError::Transform { .. } | KastError::OutputMismatch { .. })) => {
            tracing::warn!(error = %e, step = runtime.step(), "step failed");
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(FrameResponse::error(e.to_string())),
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(FrameResponse::error(format!("Step failed: {}", e))),
        ),
    }
}
