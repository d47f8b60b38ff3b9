//! # lessonstage-view
//!
//! Presenter client for a lessonstage backend. Requests one pipeline run and
//! reveals its stages over time: generation, review, and the refinement when
//! the review failed, then the final verified content.
//!
//! Reads configuration from `lessonstage-view.toml` and the environment:
//! - `LESSONSTAGE_URL` — backend URL (default: `http://localhost:8000`)
//! - `LESSONSTAGE_API_KEY` — Optional Bearer token for authentication
//!
//! ```bash
//! lessonstage-view run --grade 4 --topic "Types of Angles" --html-out pipeline.html
//! lessonstage-view replay saved-run.json --instant
//! ```

mod client;
mod config;
mod presenter;
mod sinks;

use clap::{Parser, Subcommand};
use client::LessonClient;
use config::ViewConfig;
use lessonstage_core::{AssessmentRequest, LessonError, PipelineResult, RevealTiming};
use presenter::{PresentError, Presenter};
use sinks::{Fanout, HtmlFileSink, TerminalSink};
use std::path::{Path, PathBuf};

/// lessonstage-view - staged reveal of assessment pipeline runs
#[derive(Parser, Debug)]
#[command(name = "lessonstage-view")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to a TOML config file (default: ./lessonstage-view.toml if present)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Also mirror the page to this HTML file
    #[arg(long, global = true)]
    html_out: Option<PathBuf>,

    /// Skip the reveal delays
    #[arg(long, global = true)]
    instant: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Ask the backend for a run and reveal it
    Run {
        /// Student grade (1-12)
        #[arg(short, long)]
        grade: u32,

        /// Lesson topic
        #[arg(short, long)]
        topic: String,
    },

    /// Reveal a pipeline result saved as JSON
    Replay {
        /// File written by `lessonstage generate --output`
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    // Logging to stderr only; stdout is the terminal rendering surface.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "lessonstage_view=info,lessonstage_core=info".into());
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .with_env_filter(filter)
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), PresentError> {
    let mut config = ViewConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.base_url {
        config.base_url = url;
    }
    if let Some(path) = cli.html_out {
        config.html_out = Some(path);
    }
    if cli.instant {
        config.timing = RevealTiming::instant();
    }

    let mut sink = Fanout::default();
    sink.push(TerminalSink::new(std::io::stdout()));
    if let Some(path) = &config.html_out {
        tracing::info!("Mirroring page to {}", path.display());
        sink.push(HtmlFileSink::new(path));
    }
    let mut presenter = Presenter::new(sink, config.timing);

    match cli.command {
        Command::Run { grade, topic } => {
            tracing::info!("Presenting run from {}", config.base_url);
            let client = LessonClient::new(config.base_url, config.api_key);
            presenter
                .run(&client, &AssessmentRequest::new(grade, topic))
                .await?;
        }
        Command::Replay { file } => {
            let result = read_result(&file)?;
            presenter.show(result)?;
        }
    }

    presenter.wait().await;
    Ok(())
}

fn read_result(path: &Path) -> Result<PipelineResult, LessonError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| LessonError::IoError(format!("Cannot read '{}': {}", path.display(), e)))?;
    serde_json::from_str(&text).map_err(|e| LessonError::SerializationError(e.to_string()))
}
