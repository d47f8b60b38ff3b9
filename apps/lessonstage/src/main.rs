//! # lessonstage - Assessment Pipeline Backend
//!
//! The backend binary: runs the generate → review → refine pipeline and
//! serves its full record to presenter clients.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                 apps/lessonstage (THE BACKEND)           │
//! │                                                          │
//! │  ┌─────────────┐    ┌─────────────┐    ┌─────────────┐   │
//! │  │    CLI      │    │  HTTP API   │    │   Agents    │   │
//! │  │   (clap)    │    │   (axum)    │    │  (Gemini)   │   │
//! │  └──────┬──────┘    └──────┬──────┘    └──────┬──────┘   │
//! │         └──────────────────┼──────────────────┘          │
//! │                            ▼                             │
//! │                  ┌──────────────────┐                    │
//! │                  │ lessonstage-core │                    │
//! │                  │   (THE LOGIC)    │                    │
//! │                  └──────────────────┘                    │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! lessonstage server --host 0.0.0.0 --port 8000
//!
//! # One-off run
//! lessonstage generate --grade 4 --topic "Types of Angles"
//! ```

mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // LESSONSTAGE_LOG_FORMAT=json enables machine-parseable output.
    let log_format =
        std::env::var("LESSONSTAGE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lessonstage=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the startup banner.
fn print_banner() {
    println!(
        r#"
  lessonstage v{}
  generate • review • refine
"#,
        env!("CARGO_PKG_VERSION")
    );
}
