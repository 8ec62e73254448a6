//! # KAST CLI Module
//!
//! This module implements the CLI interface for KAST.
//!
//! ## Available Commands
//!
//! - `check` - Build the engine and list its rules
//! - `run` - Replay the configured source
//! - `live` - Type frames on standard input
//! - `serve` - Start the HTTP server

mod commands;

use crate::render::IoMode;
use clap::{Parser, Subcommand};
use kast_core::KastError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// KAST - Knowledge Acquisition and Synthesis Tool
///
/// Turns raw telemetry frames into high-level knowledge and a boolean
/// world state a planner can consume.
#[derive(Parser, Debug)]
#[command(name = "kast")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the run configuration (TOML)
    #[arg(short, long, global = true, default_value = "kast.toml")]
    pub config: PathBuf,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build the engine from the configuration and list it
    Check,

    /// Replay the configured data source to the end
    Run {
        /// What to print after each step
        #[arg(long, value_enum, default_value_t = IoMode::State)]
        io: IoMode,
    },

    /// Read comma separated frames from standard input until STOP
    Live {
        /// What to print after each step
        #[arg(long, value_enum, default_value_t = IoMode::Both)]
        io: IoMode,
    },

    /// Start HTTP server
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), KastError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Check) => cmd_check(&cli.config, json_mode),
        Some(Commands::Run { io }) => cmd_run(&cli.config, json_mode, io),
        Some(Commands::Live { io }) => cmd_live(&cli.config, json_mode, io),
        Some(Commands::Serve { host, port }) => cmd_serve(&cli.config, &host, port).await,
        None => {
            // No subcommand - validate the configuration by default
            cmd_check(&cli.config, json_mode)
        }
    }
}
