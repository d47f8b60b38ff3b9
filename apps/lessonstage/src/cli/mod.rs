//! # lessonstage CLI Module
//!
//! This module implements the CLI interface for the backend.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `generate` - Run the pipeline once and print or save the result
//! - `config` - Show the resolved configuration

mod commands;

use clap::{Parser, Subcommand};
use lessonstage::config::BackendConfig;
use lessonstage_core::LessonError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// lessonstage - assessment pipeline backend
///
/// Generates a lesson and quiz for a grade and topic, has it reviewed, and
/// refines it once if the review fails.
#[derive(Parser, Debug)]
#[command(name = "lessonstage")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a TOML config file (default: ./lessonstage.toml if present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

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
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Run the pipeline once without a server
    Generate {
        /// Student grade (1-12)
        #[arg(short, long)]
        grade: u32,

        /// Lesson topic
        #[arg(short, long)]
        topic: String,

        /// Write the pipeline result JSON to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show the resolved configuration
    Config,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), LessonError> {
    let mut config = BackendConfig::load(cli.config.as_deref())?;
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => {
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            cmd_server(&config).await
        }
        Some(Commands::Generate {
            grade,
            topic,
            output,
        }) => cmd_generate(&config, json_mode, grade, &topic, output.as_deref()).await,
        Some(Commands::Config) | None => cmd_config(&config, json_mode),
    }
}
