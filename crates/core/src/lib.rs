//! # fd-core
//!
//! Execution step classification, transition planning, and log tailing
//! for the flightdeck control-plane SDK.
//!
//! This crate provides:
//! - Step classification over pipeline execution snapshots
//! - Cancel/advance transition planning and submission
//! - A generic tail-follow engine for segmented, still-growing remote logs
//! - Log source adapters for step, environment, and command-execution logs
//!
//! ## Modules
//!
//! - [`client`]: collaborator traits and the HTTP transport
//! - [`steps`]: step classifier
//! - [`transition`]: transition engine
//! - [`tail`]: generic tail-follow engine
//! - [`logs`]: log source adapters

pub mod client;
pub mod logs;
pub mod steps;
pub mod tail;
pub mod transition;
