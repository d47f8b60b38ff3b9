//! # Fixed Constants
//!
//! Reveal delays, badge labels and request limits shared by the backend and
//! the presenter client. These are compiled in; runtime configuration may
//! override the delays only.

use std::time::Duration;

// =============================================================================
// REVEAL TIMING
// =============================================================================

/// Delay between stage 1 becoming active and its completion.
pub const GENERATION_DELAY: Duration = Duration::from_millis(1000);

/// Delay between stage 2 becoming active and its completion.
pub const REVIEW_DELAY: Duration = Duration::from_millis(1500);

/// Delay between stage 3 becoming active and its completion.
pub const REFINEMENT_DELAY: Duration = Duration::from_millis(1500);

// =============================================================================
// STATUS BADGES
// =============================================================================

/// Status text shown on stage 1 while the request is in flight.
pub const STATUS_GENERATING: &str = "Generating content...";

/// Status text shown on stage 2 while the request is in flight.
pub const STATUS_WAITING: &str = "Waiting...";

/// Status text of a completed generation stage.
pub const STATUS_COMPLETED: &str = "Completed";

/// Badge class of a stage that has not completed yet.
pub const CLASS_PROCESSING: &str = "processing";

/// Badge class of a completed generation stage.
pub const CLASS_PASS: &str = "pass";

/// Review status that triggers the refinement stage.
pub const REVIEW_FAIL: &str = "fail";

/// Review status of accepted content.
pub const REVIEW_PASS: &str = "pass";

/// Message shown when the pipeline cannot be started.
pub const BACKEND_UNREACHABLE_ALERT: &str =
    "Error connecting to backend. Make sure the lessonstage server is running.";

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Lowest accepted grade.
pub const MIN_GRADE: u32 = 1;

/// Highest accepted grade.
pub const MAX_GRADE: u32 = 12;

/// Options every generated MCQ must offer.
pub const MCQ_OPTION_COUNT: usize = 4;

/// Maximum topic length in characters.
pub const MAX_TOPIC_LENGTH: usize = 200;

/// Grades above this get the advanced mock curriculum.
pub const ADVANCED_GRADE_THRESHOLD: u32 = 6;

/// Explanations shorter than this fail the mock review.
pub const MIN_EXPLANATION_CHARS: usize = 150;
