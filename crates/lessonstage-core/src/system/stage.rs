//! # Staged Reveal
//!
//! The pipeline result is complete before the reveal starts; this module
//! replays it one stage at a time so the user sees the run unfold.
//!
//! ## Transitions
//!
//! | From | Actions | To | Next delay |
//! |------|---------|----|------------|
//! | Idle | activate stage 1 | Stage1Active | generation |
//! | Stage1Active | render stage 1, activate stage 2 | Stage2Active | review |
//! | Stage2Active (refined) | render stage 2, reveal slot 3, activate stage 3 | Stage3Active | refinement |
//! | Stage2Active (not refined) | render stage 2, reveal final | Final | none |
//! | Stage3Active | render stage 3, reveal final | Final | none |
//!
//! The `*Done` states are passed through inside a single transition.

use crate::primitives::{
    CLASS_PASS, GENERATION_DELAY, REFINEMENT_DELAY, REVIEW_DELAY, STATUS_COMPLETED,
};
use crate::sink::{StageSink, StageView};
use crate::types::{LessonError, PipelineResult, StepOutput};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Label used when the review slot holds something that is not a review.
const UNKNOWN_STATUS: &str = "unknown";

// =============================================================================
// STAGE SLOT
// =============================================================================

/// The three fixed positions of the pipeline display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StageSlot {
    /// Stage 1: initial content generation
    Generation,
    /// Stage 2: content review
    Review,
    /// Stage 3: refined generation (only after a failed review)
    Refinement,
}

impl StageSlot {
    /// All slots in display order.
    pub const ALL: [StageSlot; 3] = [Self::Generation, Self::Review, Self::Refinement];

    /// 1-based position on screen.
    #[must_use]
    pub fn number(&self) -> usize {
        match self {
            StageSlot::Generation => 1,
            StageSlot::Review => 2,
            StageSlot::Refinement => 3,
        }
    }

    /// Index of this slot's output in `PipelineResult::steps`.
    #[must_use]
    pub fn step_index(&self) -> usize {
        self.number().saturating_sub(1)
    }

    /// Get the stage name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            StageSlot::Generation => "Content Generation",
            StageSlot::Review => "Content Review",
            StageSlot::Refinement => "Refined Generation",
        }
    }

    /// Get the next slot, if any.
    #[must_use]
    pub fn next(&self) -> Option<StageSlot> {
        match self {
            StageSlot::Generation => Some(StageSlot::Review),
            StageSlot::Review => Some(StageSlot::Refinement),
            StageSlot::Refinement => None,
        }
    }

    /// Whether the slot is hidden until a refinement happens.
    #[must_use]
    pub fn is_optional(&self) -> bool {
        matches!(self, StageSlot::Refinement)
    }

    fn active_state(self) -> RevealState {
        match self {
            StageSlot::Generation => RevealState::Stage1Active,
            StageSlot::Review => RevealState::Stage2Active,
            StageSlot::Refinement => RevealState::Stage3Active,
        }
    }

    fn done_state(self) -> RevealState {
        match self {
            StageSlot::Generation => RevealState::Stage1Done,
            StageSlot::Review => RevealState::Stage2Done,
            StageSlot::Refinement => RevealState::Stage3Done,
        }
    }
}

impl std::fmt::Display for StageSlot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Stage {}: {}", self.number(), self.name())
    }
}

// =============================================================================
// REVEAL STATE
// =============================================================================

/// Position of a reveal in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RevealState {
    Idle,
    Stage1Active,
    Stage1Done,
    Stage2Active,
    Stage2Done,
    Stage3Active,
    Stage3Done,
    Final,
}

impl RevealState {
    /// Check if this state is terminal (final panel shown).
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, RevealState::Final)
    }

    /// The slot currently highlighted, if any.
    #[must_use]
    pub fn active_slot(&self) -> Option<StageSlot> {
        match self {
            RevealState::Stage1Active => Some(StageSlot::Generation),
            RevealState::Stage2Active => Some(StageSlot::Review),
            RevealState::Stage3Active => Some(StageSlot::Refinement),
            _ => None,
        }
    }
}

// =============================================================================
// REVEAL TIMING
// =============================================================================

/// Artificial delay spent on each stage before it completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevealTiming {
    pub generation: Duration,
    pub review: Duration,
    pub refinement: Duration,
}

impl Default for RevealTiming {
    fn default() -> Self {
        Self {
            generation: GENERATION_DELAY,
            review: REVIEW_DELAY,
            refinement: REFINEMENT_DELAY,
        }
    }
}

impl RevealTiming {
    /// No delays at all; every transition is immediate.
    #[must_use]
    pub fn instant() -> Self {
        Self {
            generation: Duration::ZERO,
            review: Duration::ZERO,
            refinement: Duration::ZERO,
        }
    }

    /// Delay spent on `slot` while it is active.
    #[must_use]
    pub fn delay_for(&self, slot: StageSlot) -> Duration {
        match slot {
            StageSlot::Generation => self.generation,
            StageSlot::Review => self.review,
            StageSlot::Refinement => self.refinement,
        }
    }
}

// =============================================================================
// REVEAL
// =============================================================================

/// Staged reveal of one pipeline result.
///
/// Call [`Reveal::advance`] once, then again after each returned delay, until
/// it returns `None`.
#[derive(Debug, Clone)]
pub struct Reveal {
    result: PipelineResult,
    timing: RevealTiming,
    state: RevealState,
}

impl Reveal {
    /// Create a reveal, checking that every stage it will show is present.
    pub fn new(result: PipelineResult, timing: RevealTiming) -> Result<Self, LessonError> {
        result.check_steps()?;
        Ok(Self {
            result,
            timing,
            state: RevealState::Idle,
        })
    }

    #[must_use]
    pub fn state(&self) -> RevealState {
        self.state
    }

    #[must_use]
    pub fn result(&self) -> &PipelineResult {
        &self.result
    }

    /// Perform the next transition and return how long to wait before the
    /// following one. `None` means the reveal is over.
    pub fn advance<S: StageSink + ?Sized>(&mut self, sink: &mut S) -> Option<Duration> {
        match self.state {
            RevealState::Idle => Some(self.activate(sink, StageSlot::Generation)),
            RevealState::Stage1Active => {
                self.complete(sink, StageSlot::Generation);
                Some(self.activate(sink, StageSlot::Review))
            }
            RevealState::Stage2Active => {
                self.complete(sink, StageSlot::Review);
                if self.result.refined {
                    sink.reveal_stage_slot(StageSlot::Refinement);
                    Some(self.activate(sink, StageSlot::Refinement))
                } else {
                    self.finish(sink);
                    None
                }
            }
            RevealState::Stage3Active => {
                self.complete(sink, StageSlot::Refinement);
                self.finish(sink);
                None
            }
            RevealState::Stage1Done
            | RevealState::Stage2Done
            | RevealState::Stage3Done
            | RevealState::Final => None,
        }
    }

    /// Run every remaining transition without waiting. Returns the delays that
    /// a timed playback would have spent.
    pub fn run_to_end<S: StageSink + ?Sized>(&mut self, sink: &mut S) -> Vec<Duration> {
        let mut delays = Vec::new();
        while let Some(delay) = self.advance(sink) {
            delays.push(delay);
        }
        delays
    }

    fn transition(&mut self, to: RevealState) {
        tracing::debug!(from = ?self.state, to = ?to, "reveal transition");
        self.state = to;
    }

    fn activate<S: StageSink + ?Sized>(&mut self, sink: &mut S, slot: StageSlot) -> Duration {
        sink.activate_stage(slot);
        self.transition(slot.active_state());
        self.timing.delay_for(slot)
    }

    fn complete<S: StageSink + ?Sized>(&mut self, sink: &mut S, slot: StageSlot) {
        if let Some(step) = self.result.steps.get(slot.step_index()) {
            let view = stage_view(slot, &step.output);
            sink.render_stage(slot, &view);
        }
        self.transition(slot.done_state());
    }

    fn finish<S: StageSink + ?Sized>(&mut self, sink: &mut S) {
        sink.reveal_final(&self.result.final_content);
        self.transition(RevealState::Final);
    }
}

/// Badge for a completed slot. Generation slots always read `Completed`;
/// the review slot shows the reviewer's verdict.
fn stage_view(slot: StageSlot, output: &StepOutput) -> StageView<'_> {
    let (status_label, status_class) = match slot {
        StageSlot::Generation | StageSlot::Refinement => {
            (STATUS_COMPLETED.to_string(), CLASS_PASS.to_string())
        }
        StageSlot::Review => match output.as_review() {
            Some(review) => (review.status_label(), review.status.clone()),
            None => (UNKNOWN_STATUS.to_uppercase(), UNKNOWN_STATUS.to_string()),
        },
    };
    StageView {
        status_label,
        status_class,
        output,
    }
}

// =============================================================================
// TESTS
// =============================================================================
