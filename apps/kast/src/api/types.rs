//! # API Request/Response Types
//!
//! This module defines the JSON structures for the HTTP API.

use kast_core::{PddlSpellbook, StepReport};
use serde::{Deserialize, Serialize};

// =============================================================================
// HEALTH RESPONSE
// =============================================================================

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

// =============================================================================
// STATUS RESPONSE
// =============================================================================

/// Engine status response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub step: u64,
    pub low_level_count: usize,
    pub high_level_count: usize,
    pub kaster_count: usize,
    pub predicate_count: usize,
}

impl StatusResponse {
    #[must_use]
    pub fn from_spellbook(step: u64, book: &PddlSpellbook) -> Self {
        Self {
            step,
            low_level_count: book.low_level_knowledge().len(),
            high_level_count: book.high_level_knowledge().len(),
            kaster_count: book.spellbook().kasters().len(),
            predicate_count: book.predicates().count(),
        }
    }
}

// =============================================================================
// FRAME RESPONSE
// =============================================================================

/// Result of pushing one low-level frame through a step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameResponse {
    pub success: bool,
    pub report: Option<StepReport>,
    pub error: Option<String>,
}

impl FrameResponse {
    #[must_use]
    pub fn success(report: StepReport) -> Self {
        Self {
            success: true,
            report: Some(report),
            error: None,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            success: false,
            report: None,
            error: Some(msg.into()),
        }
    }
}
