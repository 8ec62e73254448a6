//! # KAST - Knowledge Acquisition and Synthesis Tool
//!
//! The main binary for the KAST knowledge synthesis engine.
//!
//! ## Usage
//!
//! ```bash
//! # Validate a configuration and list its rules
//! kast -c kast.toml check
//!
//! # Replay the configured source, printing both knowledge tiers
//! kast -c kast.toml run --io both
//!
//! # Type frames by hand
//! kast -c kast.toml live
//!
//! # Start the HTTP server
//! kast -c kast.toml serve --host 0.0.0.0 --port 8080
//! ```

use clap::Parser;
use kast::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // Initialize tracing — KAST_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("KAST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "kast=info,kast_core=info,tower_http=debug".into());

    // Logs go to stderr so step output on stdout stays clean.
    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    // Parse CLI arguments
    let cli = cli::Cli::parse();

    // Display startup banner
    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    // Execute command
    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the KAST startup banner.
fn print_banner() {
    println!(
        r#"
  ██╗  ██╗ █████╗ ███████╗████████╗
  ██║ ██╔╝██╔══██╗██╔════╝╚══██╔══╝
  █████╔╝ ███████║███████╗   ██║
  ██╔═██╗ ██╔══██║╚════██║   ██║
  ██║  ██╗██║  ██║███████║   ██║
  ╚═╝  ╚═╝╚═╝  ╚═╝╚══════╝   ╚═╝

  Knowledge Acquisition and Synthesis Tool v{}

  Frames • Knowledge • State
"#,
        env!("CARGO_PKG_VERSION")
    );
}
