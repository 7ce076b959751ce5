//! Declarative detection rules for sensor events.
//!
//! This crate provides:
//! - YAML-based rule definition with serde deserialization
//! - Corpus loader scanning a directory in lexical filename order
//! - The matching engine evaluating an event against the corpus

pub mod loader;
pub mod matcher;
pub mod schema;

pub use loader::{Corpus, RuleError};
pub use matcher::{evaluate, match_in_dir, RuleMatch};
pub use schema::{Condition, DetectionRule};
