//! # fd-protocol
//!
//! Shared data models for the flightdeck control-plane SDK.
//!
//! This crate defines the wire representations used when talking to the
//! CI/CD control-plane API:
//! - Pipeline execution snapshots and their step states
//! - Quality-gate metrics attached to a step
//! - Command executions and their lifecycle status
//! - HAL-style hyperlinks and the link relation names the SDK consumes
//!
//! ## Modules
//!
//! - [`execution_models`]: executions, step states, statuses, and links
//! - [`metric_models`]: quality-gate metric results
//! - [`command_models`]: command executions
//! - [`rels`]: link relation names
//!
//! ## Design Principles
//!
//! - Minimal dependencies: only serde and chrono
//! - Read-only snapshots: the client never mutates a resource locally,
//!   it re-fetches a fresh copy after requesting a transition
//! - Independent compilation: no dependencies on other flightdeck crates

pub mod command_models;
pub mod execution_models;
pub mod metric_models;
pub mod rels;

// Re-export all public types for convenience
pub use command_models::*;
pub use execution_models::*;
pub use metric_models::*;
