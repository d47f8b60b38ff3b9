//! # Stage Sink
//!
//! The capability a presentation surface offers to the reveal state machine.
//! The state machine decides *when* and *what*; a sink decides *how* it looks
//! (an HTML page model, a terminal, a recording in tests).

use crate::system::StageSlot;
use crate::types::{FinalContent, StepOutput};

/// What a completed stage shows: its badge and its structured output.
#[derive(Debug, Clone, PartialEq)]
pub struct StageView<'a> {
    /// Badge text, e.g. `Completed` or the uppercased review status.
    pub status_label: String,
    /// Badge style class, e.g. `pass`, `fail`.
    pub status_class: String,
    /// The stage output; templates are chosen from its shape.
    pub output: &'a StepOutput,
}

/// Presentation surface driven by [`crate::Reveal`].
///
/// Implementations must not block: every call happens between two timer
/// ticks of the reveal scheduler.
pub trait StageSink {
    /// Put the surface into its pre-run state: pipeline shown, final hidden,
    /// stage 1 and 2 processing, stage 3 slot hidden.
    fn reset(&mut self);

    /// Highlight `slot` as the stage currently running.
    fn activate_stage(&mut self, slot: StageSlot);

    /// Mark `slot` complete and show its rendered output.
    fn render_stage(&mut self, slot: StageSlot, view: &StageView<'_>);

    /// Make a normally hidden stage slot visible.
    fn reveal_stage_slot(&mut self, slot: StageSlot);

    /// Show the final verified content.
    fn reveal_final(&mut self, content: &FinalContent);

    /// Blocking user-facing notice. Used only when a run cannot start.
    fn alert(&mut self, message: &str);
}
