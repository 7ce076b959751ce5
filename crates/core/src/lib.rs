//! Shared types for the decoywatch telemetry pipeline.
//!
//! This crate provides:
//! - The [`Event`] record every other crate consumes
//! - Severity and run-status enums shared across the wire
//! - Environment-driven configuration

pub mod config;
pub mod event;
pub mod severity;

pub use config::Config;
pub use event::Event;
pub use severity::{RunStatus, Severity};
