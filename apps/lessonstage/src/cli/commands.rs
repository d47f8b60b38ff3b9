//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.

use lessonstage::{
    agents::{AgentBackend, Agents},
    api,
    config::BackendConfig,
};
use lessonstage_core::{
    AssessmentRequest, LessonError, PipelineResult, StepOutput,
    render::{final_text, stage_text},
};
use std::path::Path;

fn build_agents(config: &BackendConfig) -> Result<Agents, LessonError> {
    let backend = AgentBackend::from_config(config)
        .map_err(|e| LessonError::ConfigError(format!("Cannot create model client: {}", e)))?;
    Ok(Agents::new(backend))
}

// =============================================================================
// SERVER COMMAND
// =============================================================================

/// Start the HTTP server.
pub async fn cmd_server(config: &BackendConfig) -> Result<(), LessonError> {
    let agents = build_agents(config)?;

    println!("lessonstage Backend Starting...");
    println!();
    println!("Configuration:");
    println!("  Host:     {}", config.host);
    println!("  Port:     {}", config.port);
    println!("  Agents:   {}", agents.backend().name());
    println!();
    println!("Endpoints:");
    println!("  POST /generate-assessment - Run the pipeline");
    println!("  GET  /health              - Health check");
    println!();
    println!("Press Ctrl+C to stop");
    println!();

    api::run_server(&config.bind_addr(), agents).await
}

// =============================================================================
// GENERATE COMMAND
// =============================================================================

/// Run the pipeline once and print the outcome.
pub async fn cmd_generate(
    config: &BackendConfig,
    json_mode: bool,
    grade: u32,
    topic: &str,
    output: Option<&Path>,
) -> Result<(), LessonError> {
    let agents = build_agents(config)?;
    let result = agents.run(AssessmentRequest::new(grade, topic)).await?;

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| LessonError::SerializationError(e.to_string()))?;
        std::fs::write(path, json).map_err(|e| {
            LessonError::IoError(format!("Cannot write '{}': {}", path.display(), e))
        })?;
        tracing::info!("Pipeline result written to {}", path.display());
    }

    if json_mode {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| LessonError::SerializationError(e.to_string()))?;
        println!("{}", json);
        return Ok(());
    }

    print_result(&result);
    Ok(())
}

fn print_result(result: &PipelineResult) {
    println!("Assessment Pipeline");
    println!("===================");
    println!("Refined: {}", if result.refined { "yes" } else { "no" });
    for (i, step) in result.steps.iter().enumerate() {
        println!();
        let status = match &step.output {
            StepOutput::Review { output: review, .. } => review.status_label(),
            _ => "Completed".to_string(),
        };
        println!("[{}] {} - {} ({})", i.saturating_add(1), step.agent, step.action, status);
        print!("{}", stage_text(&step.output));
    }
    println!();
    print!("{}", final_text(&result.final_content));
}

// =============================================================================
// CONFIG COMMAND
// =============================================================================

/// Show the resolved configuration. The model key itself is never printed.
pub fn cmd_config(config: &BackendConfig, json_mode: bool) -> Result<(), LessonError> {
    let agents = if config.google_api_key.is_some() {
        config.model.as_str()
    } else {
        "offline"
    };

    if json_mode {
        let output = serde_json::json!({
            "host": config.host,
            "port": config.port,
            "model": config.model,
            "gemini_url": config.gemini_url,
            "agents": agents,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).unwrap_or_default()
        );
        return Ok(());
    }

    println!("lessonstage Configuration");
    println!("=========================");
    println!("Bind:       {}", config.bind_addr());
    println!("Model:      {}", config.model);
    println!("Gemini URL: {}", config.gemini_url);
    println!("Agents:     {}", agents);
    Ok(())
}
