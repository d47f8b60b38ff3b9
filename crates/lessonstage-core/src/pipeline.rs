//! # Pipeline Run
//!
//! Records the stages of one assessment run and assembles the
//! [`PipelineResult`] the presenter replays.
//!
//! Stage order is fixed: draft generation, review, and a single refinement
//! pass only when the review fails. The agents themselves are called by the
//! owner of the run; this type only keeps the record honest.

use crate::agents::{GENERATOR_AGENT, GenerationInput, REVIEWER_AGENT, mock_generate, mock_review};
use crate::types::{
    AssessmentRequest, GenerationOutput, LessonError, PipelineResult, PipelineStep, ReviewOutput,
};

const ACTION_INITIAL: &str = "Initial Generation";
const ACTION_REVIEW: &str = "Content Review";
const ACTION_REFINED: &str = "Refined Generation";

/// In-progress record of one run.
#[derive(Debug, Clone)]
pub struct PipelineRun {
    request: AssessmentRequest,
    draft: Option<GenerationOutput>,
    review: Option<ReviewOutput>,
    refinement: Option<GenerationOutput>,
}

impl PipelineRun {
    /// Start a run for a validated request.
    pub fn start(request: AssessmentRequest) -> Result<Self, LessonError> {
        request.validate()?;
        Ok(Self {
            request,
            draft: None,
            review: None,
            refinement: None,
        })
    }

    #[must_use]
    pub fn request(&self) -> &AssessmentRequest {
        &self.request
    }

    /// Input for the first generator call.
    #[must_use]
    pub fn draft_input(&self) -> GenerationInput {
        GenerationInput::new(self.request.grade, self.request.topic.clone())
    }

    pub fn record_draft(&mut self, draft: GenerationOutput) {
        self.draft = Some(draft);
    }

    /// Record the review. Returns the refinement input when the review failed.
    pub fn record_review(&mut self, review: ReviewOutput) -> Option<GenerationInput> {
        let refinement = review
            .is_fail()
            .then(|| self.draft_input().with_feedback(review.feedback.clone()));
        self.review = Some(review);
        refinement
    }

    pub fn record_refinement(&mut self, refined: GenerationOutput) {
        self.refinement = Some(refined);
    }

    /// Assemble the result. Fails if a required stage was never recorded.
    pub fn finish(self) -> Result<PipelineResult, LessonError> {
        let draft = self.draft.ok_or(LessonError::MissingStep(0))?;
        let review = self.review.ok_or(LessonError::MissingStep(1))?;
        let needs_refinement = review.is_fail();

        let mut steps = vec![
            PipelineStep::new(GENERATOR_AGENT, ACTION_INITIAL, draft.clone()),
            PipelineStep::new(REVIEWER_AGENT, ACTION_REVIEW, review),
        ];

        let final_content = match (needs_refinement, self.refinement) {
            (true, Some(refined)) => {
                steps.push(PipelineStep::new(
                    GENERATOR_AGENT,
                    ACTION_REFINED,
                    refined.clone(),
                ));
                refined
            }
            (true, None) => return Err(LessonError::MissingStep(2)),
            (false, _) => draft,
        };

        Ok(PipelineResult {
            grade: Some(self.request.grade),
            topic: Some(self.request.topic),
            refined: needs_refinement,
            final_content,
            steps,
        })
    }
}

/// Run the whole pipeline with the offline agents.
pub fn run_offline(request: AssessmentRequest) -> Result<PipelineResult, LessonError> {
    let mut run = PipelineRun::start(request)?;
    let draft = mock_generate(&run.draft_input());
    let review = mock_review(&draft, run.request().grade, &run.request().topic);
    run.record_draft(draft);
    if let Some(input) = run.record_review(review) {
        run.record_refinement(mock_generate(&input));
    }
    run.finish()
}
