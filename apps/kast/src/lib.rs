//! # KAST
//!
//! The runner around `kast-core`: configuration, data sources, the built-in
//! transform library, the CLI and the HTTP adapter.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                    apps/kast (THE BINARY)                │
//! │                                                          │
//! │  ┌──────────┐   ┌──────────┐   ┌──────────────────────┐  │
//! │  │   CLI    │   │ HTTP API │   │ config / sources /   │  │
//! │  │  (clap)  │   │  (axum)  │   │ transforms           │  │
//! │  └────┬─────┘   └────┬─────┘   └──────────┬───────────┘  │
//! │       └──────────────┼────────────────────┘              │
//! │                      ▼                                   │
//! │              ┌───────────────┐                           │
//! │              │   kast-core   │                           │
//! │              │  (THE LOGIC)  │                           │
//! │              └───────────────┘                           │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod api;
pub mod cli;
pub mod config;
pub mod render;
pub mod sources;
pub mod transforms;
