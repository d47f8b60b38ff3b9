//! # lessonstage-core
//!
//! The pure logic of lessonstage - THE LOGIC.
//!
//! An assessment pipeline (generate, review, optionally refine) runs on the
//! backend and returns its full record at once. This crate holds everything
//! needed to build that record and to replay it stage by stage:
//! - `types` - the wire data model and error type
//! - `agents` - prompts, reply parsing and the offline curriculum
//! - `pipeline` - assembly of a run's stages into a result
//! - `system` - the staged reveal state machine
//! - `sink` / `page` - the presentation capability and its page model
//! - `render` - HTML and text templates
//!
//! ## Architectural Constraints
//!
//! - NO async, NO network dependencies (pure Rust)
//! - The reveal machine returns delays instead of sleeping

// =============================================================================
// MODULES
// =============================================================================

pub mod agents;
pub mod page;
pub mod pipeline;
pub mod primitives;
pub mod render;
pub mod sink;
pub mod system;
pub mod types;

// =============================================================================
// RE-EXPORTS: Core Types (from types module)
// =============================================================================

pub use types::{
    AssessmentRequest, FinalContent, GenerationOutput, LessonError, Mcq, PipelineResult,
    PipelineStep, ReviewOutput, StepOutput,
};

// =============================================================================
// RE-EXPORTS: Pipeline & Presentation
// =============================================================================

pub use page::{PageModel, SlotState};
pub use pipeline::{PipelineRun, run_offline};
pub use sink::{StageSink, StageView};
pub use system::{Reveal, RevealState, RevealTiming, StageSlot};
