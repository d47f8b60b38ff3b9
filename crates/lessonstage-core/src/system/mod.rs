//! # System Module
//!
//! Stage slots and the staged reveal state machine.
//!
//! The reveal logic is pure: it mutates a [`crate::StageSink`] and returns the
//! delay until its next transition. Sleeping, cancellation and threading are
//! the caller's business, so the same machine drives the async presenter
//! client and the synchronous CLI preview.

mod stage;

pub use stage::*;
