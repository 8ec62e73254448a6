//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use crate::api;
use crate::config::KastConfig;
use crate::render::{self, IoMode};
use crate::sources;
use crate::transforms::builtin_registry;
use kast_core::{DataSource, KastError, PddlSpellbook, Runtime, StepReport};
use std::path::Path;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Load the configuration, open its source and build the engine.
pub fn prepare(config_path: &Path) -> Result<(KastConfig, Box<dyn DataSource>, PddlSpellbook), KastError> {
    let config = KastConfig::load(config_path)?;
    let source = sources::open(&config)?;
    let book = config.build(&builtin_registry(), source.headers())?;
    Ok((config, source, book))
}

fn print_step(report: &StepReport, book: &PddlSpellbook, json_mode: bool, io: IoMode) {
    if json_mode {
        let line = render::step_json(report, book, io);
        println!("{}", serde_json::to_string(&line).unwrap_or_default());
    } else {
        println!("{}", render::step_text(report, book, io));
    }
}

/// Drive `source` to the end, printing every step.
fn drive(
    source: &mut dyn DataSource,
    book: PddlSpellbook,
    json_mode: bool,
    io: IoMode,
) -> Result<u64, KastError> {
    let mut runtime = Runtime::new(book);

    if !json_mode {
        println!("{}", render::run_header());
    }
    let steps = runtime.execute(source, |report, book| print_step(report, book, json_mode, io))?;
    if !json_mode {
        println!("{}", render::run_footer(steps));
    }
    Ok(steps)
}

// =============================================================================
// CHECK COMMAND
// =============================================================================

/// Build the engine and describe it.
pub fn cmd_check(config_path: &Path, json_mode: bool) -> Result<(), KastError> {
    let (_, _, book) = prepare(config_path)?;

    if json_mode {
        let output = render::describe_json(&book);
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("KAST Configuration");
    println!("==================");
    println!("Config: {}", config_path.display());
    println!();
    print!("{}", render::describe_text(&book));
    Ok(())
}

// =============================================================================
// RUN COMMAND
// =============================================================================

/// Replay the configured source.
pub fn cmd_run(config_path: &Path, json_mode: bool, io: IoMode) -> Result<(), KastError> {
    let (_, mut source, book) = prepare(config_path)?;
    drive(source.as_mut(), book, json_mode, io)?;
    Ok(())
}

// =============================================================================
// LIVE COMMAND
// =============================================================================

/// Read frames typed on standard input, whatever source the file names.
pub fn cmd_live(config_path: &Path, json_mode: bool, io: IoMode) -> Result<(), KastError> {
    let config = KastConfig::load(config_path)?;
    let mut source = sources::open_stdin(&config);
    let book = config.build(&builtin_registry(), source.headers())?;

    if !json_mode {
        println!("Enter comma separated values for: {}", source.headers().join(", "));
        println!("Type {} to finish.", sources::STOP_COMMAND);
    }
    drive(&mut source, book, json_mode, io)?;
    Ok(())
}

// =============================================================================
// SERVE COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_serve(config_path: &Path, host: &str, port: u16) -> Result<(), KastError> {
    let (config, _, book) = prepare(config_path)?;

    println!("KAST Knowledge Server Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:       {}", host);
    println!("  Port:       {}", port);
    println!("  Config:     {}", config_path.display());
    println!("  Kasters:    {}", config.kasters.len());
    println!("  Predicates: {}", config.predicates.len());
    println!();
    println!("Endpoints:");
    println!("  POST /frame          - Run one step");
    println!("  GET  /state          - Predicate state");
    println!("  GET  /knowledge/low  - Low level knowledge");
    println!("  GET  /knowledge/high - High level knowledge");
    println!("  GET  /snapshot       - Knowledge and state");
    println!("  GET  /status         - Engine status");
    println!("  GET  /health         - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    let addr = format!("{}:{}", host, port);
    api::run_server(&addr, Runtime::new(book)).await
}
