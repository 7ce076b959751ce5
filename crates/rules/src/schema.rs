//! YAML schema types for detection rules.
//!
//! A rule file is either a single bare rule document or a group wrapper
//! holding several rules:
//!
//! ```yaml
//! group: deception-ssh
//! rules:
//!   - id: "200001"
//!     description: SSH login failed on the decoy
//!     conditions:
//!       - substring_set: "login.failed|login.failure"
//!       - pattern: "session\\.(connect|closed)"
//!       - exact_field: "source_address=10.0.0.1"
//! ```

use serde::{Deserialize, Serialize};

/// One atomic test within a rule.
///
/// Condition kinds this engine does not know deserialize into
/// [`Condition::Unknown`] and evaluate vacuously true, so rule files written
/// for a newer engine still load here without blocking their rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Pipe-delimited alternatives; matches when the flattened event text
    /// contains any of them (case-insensitive).
    SubstringSet(String),

    /// Case-insensitive regular expression against the flattened event text.
    /// A pattern that fails to compile evaluates false.
    Pattern(String),

    /// `<field>=<value>` equality against one named event field.
    /// A spec without `=` evaluates false.
    ExactField(String),

    /// Forward-compatible catch-all; always evaluates true.
    #[serde(untagged)]
    Unknown(serde_yaml::Value),
}

/// A named, declarative condition set used to flag events of interest.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectionRule {
    /// Rule identifier; used as the match result key, not required to be
    /// globally unique across files.
    pub id: String,

    /// Free-text description carried into match results.
    #[serde(default)]
    pub description: String,

    /// Conjunctive condition list. A rule with zero conditions never
    /// matches; it would otherwise fire on every event.
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

/// A group wrapper bundling several rules in one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleGroup {
    /// Optional group label; informational only.
    #[serde(default)]
    pub group: Option<String>,

    pub rules: Vec<DetectionRule>,
}

/// One parsed rule file: either a bare rule or a group of rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleDocument {
    Group(RuleGroup),
    Single(DetectionRule),
}

impl RuleDocument {
    /// Flatten the document into its rules, preserving in-document order.
    pub fn into_rules(self) -> Vec<DetectionRule> {
        match self {
            RuleDocument::Group(group) => group.rules,
            RuleDocument::Single(rule) => vec![rule],
        }
    }
}
