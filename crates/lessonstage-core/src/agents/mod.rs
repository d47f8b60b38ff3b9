//! # Agents
//!
//! The pure half of the generator and reviewer agents: their inputs, prompt
//! text, reply parsing, failure fallbacks and the deterministic offline
//! curriculum used when no model is configured. Calling a model is the
//! backend's job.

mod mock;
mod prompts;

pub use mock::{mock_generate, mock_review};
pub use prompts::{
    generator_prompt, parse_generation, parse_review, reviewer_prompt, strip_code_fence,
};

use crate::primitives::REVIEW_FAIL;
use crate::types::{GenerationOutput, ReviewOutput};

/// Display name of the generator in recorded steps.
pub const GENERATOR_AGENT: &str = "Generator Agent";

/// Display name of the reviewer in recorded steps.
pub const REVIEWER_AGENT: &str = "Reviewer Agent";

/// What the generator is asked to produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationInput {
    pub grade: u32,
    pub topic: String,
    /// Reviewer feedback; non-empty only for a refinement pass.
    pub feedback: Vec<String>,
}

impl GenerationInput {
    pub fn new(grade: u32, topic: impl Into<String>) -> Self {
        Self {
            grade,
            topic: topic.into(),
            feedback: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_feedback(mut self, feedback: Vec<String>) -> Self {
        self.feedback = feedback;
        self
    }

    #[must_use]
    pub fn is_refinement(&self) -> bool {
        !self.feedback.is_empty()
    }
}

/// Generator output used when the model call or its reply fails.
#[must_use]
pub fn generation_failure(error: &str) -> GenerationOutput {
    GenerationOutput::new(
        format!(
            "Oh no! I had a little trouble with my lesson plan. (Error: {})",
            error
        ),
        Vec::new(),
    )
}

/// Reviewer output used when the model call or its reply fails.
#[must_use]
pub fn review_failure(error: &str) -> ReviewOutput {
    ReviewOutput::new(REVIEW_FAIL, [format!("Error in review: {}", error)])
}
