//! # lessonstage
//!
//! Library half of the lessonstage backend: the HTTP API, the model-backed
//! agents and configuration loading. The binary in `main.rs` adds the CLI.

pub mod agents;
pub mod api;
pub mod config;
