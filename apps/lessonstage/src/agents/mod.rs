//! # Agents
//!
//! The generator and reviewer as the backend runs them. With a model API key
//! both call Gemini; without one they use the offline curriculum from
//! `lessonstage-core`. Model failures never abort a run: they turn into an
//! apologetic lesson or a failing review so the pipeline still completes.

mod gemini;

pub use gemini::{AgentError, GeminiClient};

use crate::config::BackendConfig;
use lessonstage_core::{
    AssessmentRequest, GenerationOutput, LessonError, PipelineResult, PipelineRun, ReviewOutput,
    agents::{
        GenerationInput, generation_failure, generator_prompt, mock_generate, mock_review,
        parse_generation, parse_review, review_failure, reviewer_prompt,
    },
};

/// Where agent answers come from.
#[derive(Debug, Clone)]
pub enum AgentBackend {
    /// Deterministic offline curriculum.
    Offline,
    /// Live model.
    Gemini(GeminiClient),
}

impl AgentBackend {
    /// Pick the backend from configuration: a model API key selects Gemini.
    pub fn from_config(config: &BackendConfig) -> Result<Self, AgentError> {
        match &config.google_api_key {
            Some(key) => Ok(Self::Gemini(GeminiClient::new(
                config.gemini_url.clone(),
                config.model.clone(),
                key.clone(),
            )?)),
            None => Ok(Self::Offline),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Offline => "offline",
            Self::Gemini(client) => client.model(),
        }
    }
}

/// Generator + reviewer pair driving one pipeline run.
#[derive(Debug, Clone)]
pub struct Agents {
    backend: AgentBackend,
}

impl Agents {
    #[must_use]
    pub fn new(backend: AgentBackend) -> Self {
        Self { backend }
    }

    #[must_use]
    pub fn offline() -> Self {
        Self::new(AgentBackend::Offline)
    }

    #[must_use]
    pub fn backend(&self) -> &AgentBackend {
        &self.backend
    }

    /// Produce a draft, or a refinement when `input` carries feedback.
    pub async fn generate(&self, input: &GenerationInput) -> GenerationOutput {
        match &self.backend {
            AgentBackend::Offline => mock_generate(input),
            AgentBackend::Gemini(client) => {
                let reply = client.complete(&generator_prompt(input)).await;
                match reply.map_err(|e| e.to_string()).and_then(|text| {
                    parse_generation(&text).map_err(|e| e.to_string())
                }) {
                    Ok(output) => output,
                    Err(e) => {
                        tracing::warn!(topic = %input.topic, "Generator failed: {}", e);
                        generation_failure(&e)
                    }
                }
            }
        }
    }

    /// Judge `content` for `grade` and `topic`.
    pub async fn review(&self, content: &GenerationOutput, grade: u32, topic: &str) -> ReviewOutput {
        match &self.backend {
            AgentBackend::Offline => mock_review(content, grade, topic),
            AgentBackend::Gemini(client) => {
                let outcome = match reviewer_prompt(content, grade, topic) {
                    Ok(prompt) => match client.complete(&prompt).await {
                        Ok(text) => parse_review(&text).map_err(|e| e.to_string()),
                        Err(e) => Err(e.to_string()),
                    },
                    Err(e) => Err(e.to_string()),
                };
                outcome.unwrap_or_else(|e| {
                    tracing::warn!(topic = %topic, "Reviewer failed: {}", e);
                    review_failure(&e)
                })
            }
        }
    }

    /// Generate, review, and refine once if the review fails.
    pub async fn run(&self, request: AssessmentRequest) -> Result<PipelineResult, LessonError> {
        let mut run = PipelineRun::start(request)?;
        let (grade, topic) = (run.request().grade, run.request().topic.clone());

        tracing::info!(grade, topic = %topic, backend = self.backend.name(), "Pipeline run started");

        let draft = self.generate(&run.draft_input()).await;
        let review = self.review(&draft, grade, &topic).await;
        tracing::info!(status = %review.status, "Review finished");

        run.record_draft(draft);
        if let Some(input) = run.record_review(review) {
            tracing::info!(feedback = input.feedback.len(), "Refining after failed review");
            let refined = self.generate(&input).await;
            run.record_refinement(refined);
        }

        let result = run.finish()?;
        tracing::info!(refined = result.refined, steps = result.steps.len(), "Pipeline run finished");
        Ok(result)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_selection() {
        let offline = AgentBackend::from_config(&BackendConfig::default()).expect("backend");
        assert!(matches!(offline, AgentBackend::Offline));

        let config = BackendConfig {
            google_api_key: Some("k".into()),
            ..BackendConfig::default()
        };
        let live = AgentBackend::from_config(&config).expect("backend");
        assert_eq!(live.name(), config.model);
    }

    #[tokio::test]
    async fn test_offline_run_refines_short_lesson() {
        let agents = Agents::offline();
        let result = agents
            .run(AssessmentRequest::new(4, "Volcanoes"))
            .await
            .expect("run");
        assert!(result.refined);
        assert_eq!(result.steps.len(), 3);
    }

    #[tokio::test]
    async fn test_invalid_request_is_rejected() {
        let agents = Agents::offline();
        assert!(agents.run(AssessmentRequest::new(4, "")).await.is_err());
    }

    #[tokio::test]
    async fn test_unreachable_model_yields_fallbacks() {
        let client = GeminiClient::new("http://127.0.0.1:9", "test-model", "key").expect("client");
        let agents = Agents::new(AgentBackend::Gemini(client));

        let result = agents
            .run(AssessmentRequest::new(4, "Angles"))
            .await
            .expect("run completes despite model errors");

        // Failed review forces a refinement; both generations are apologies.
        assert!(result.refined);
        assert!(result.final_content.explanation.starts_with("Oh no!"));
        let review = result.steps[1].output.as_review().expect("review");
        assert!(review.feedback[0].starts_with("Error in review:"));
    }
}
