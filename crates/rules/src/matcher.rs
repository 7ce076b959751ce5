//! The rule matching engine.
//!
//! Flattens an event into one lower-cased text blob and evaluates each rule's
//! conditions as a conjunction. The first matching rule in corpus scan order
//! wins. Evaluation is pure: no caching, no shared state.

use std::path::Path;

use regex::RegexBuilder;
use serde::Serialize;
use tracing::warn;

use decoywatch_core::Event;

use crate::loader::Corpus;
use crate::schema::{Condition, DetectionRule};

/// Result for the first rule whose conditions all hold.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RuleMatch {
    pub rule_id: String,
    pub description: String,
}

/// Fields flattened into the matchable event text, in order.
const FLATTEN_FIELDS: &[&str] = &[
    "event_kind",
    "message",
    "input",
    "username",
    "password",
    "source_address",
    "sensor",
];

/// Flatten the semantically relevant event fields into one lower-cased,
/// space-joined string. Empty fields are skipped; an empty result is legal
/// and simply fails all text conditions.
pub fn flatten_event(event: &Event) -> String {
    FLATTEN_FIELDS
        .iter()
        .filter_map(|name| event.field(name))
        .filter(|value| !value.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

impl Condition {
    /// Whether this condition holds for the given event.
    ///
    /// `event_text` is the pre-flattened text for the same event.
    pub fn holds(&self, event_text: &str, event: &Event) -> bool {
        match self {
            Condition::SubstringSet(alternatives) => alternatives
                .split('|')
                .map(|alt| alt.trim().to_lowercase())
                .filter(|alt| !alt.is_empty())
                .any(|alt| event_text.contains(&alt)),

            Condition::Pattern(pattern) => {
                match RegexBuilder::new(pattern).case_insensitive(true).build() {
                    Ok(re) => re.is_match(event_text),
                    Err(e) => {
                        warn!(pattern, error = %e, "invalid rule pattern, treating as non-matching");
                        false
                    }
                }
            }

            Condition::ExactField(spec) => match spec.split_once('=') {
                Some((field, value)) => {
                    event.field(field.trim()).as_deref() == Some(value.trim())
                }
                None => {
                    warn!(spec, "exact_field condition missing '=', treating as non-matching");
                    false
                }
            },

            // Unknown kinds must not block the rule.
            Condition::Unknown(_) => true,
        }
    }
}

impl DetectionRule {
    /// A rule matches iff it has at least one condition and all hold.
    pub fn matches(&self, event_text: &str, event: &Event) -> bool {
        !self.conditions.is_empty()
            && self.conditions.iter().all(|c| c.holds(event_text, event))
    }
}

/// Evaluate an event against a loaded corpus.
///
/// Returns the first matching rule in corpus scan order, or `None`.
pub fn evaluate(event: &Event, corpus: &Corpus) -> Option<RuleMatch> {
    let event_text = flatten_event(event);
    corpus
        .rules()
        .iter()
        .find(|rule| rule.matches(&event_text, event))
        .map(|rule| RuleMatch {
            rule_id: rule.id.clone(),
            description: rule.description.clone(),
        })
}

/// Evaluate an event against the rule files in `dir`, loading fresh.
///
/// An unreadable directory yields no match (logged), mirroring how a
/// missing corpus means nothing can be flagged.
pub fn match_in_dir(event: &Event, dir: &Path) -> Option<RuleMatch> {
    match Corpus::load(dir) {
        Ok(corpus) => evaluate(event, &corpus),
        Err(e) => {
            warn!(dir = %dir.display(), error = %e, "cannot load rule corpus");
            None
        }
    }
}
