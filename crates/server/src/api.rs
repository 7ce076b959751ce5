//! HTTP handlers.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::sse::{Event as SseEvent, KeepAlive, Sse};
use axum::Json;
use futures::stream::Stream;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use decoywatch_core::Event;
use decoywatch_rules::{evaluate, Corpus};

use crate::state::AppState;

// ── Ingest ──────────────────────────────────────────────────────

/// Inbound payload: a single event or an array of events.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum EventPayload {
    Batch(Vec<Event>),
    Single(Event),
}

impl EventPayload {
    pub fn into_batch(self) -> Vec<Event> {
        match self {
            EventPayload::Batch(batch) => batch,
            EventPayload::Single(event) => vec![event],
        }
    }
}

/// Receive sensor events, broadcast them, and kick off an enrichment run.
pub async fn ingest(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EventPayload>,
) -> Json<serde_json::Value> {
    let receipt = state.orchestrator.ingest(payload.into_batch());
    Json(json!({
        "status": "broadcasted",
        "run_id": receipt.run_id,
        "items": receipt.items,
        "subscribers": receipt.subscribers,
    }))
}

// ── Live stream ─────────────────────────────────────────────────

/// SSE feed of every bus message: raw events, classifications, attack
/// chains, tickets, and completion events.
///
/// The subscription deregisters itself when the client disconnects and
/// axum drops the stream.
pub async fn stream_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let subscriber = state.bus.subscribe();
    info!(
        subscriber_id = subscriber.id(),
        total = state.bus.subscriber_count(),
        "stream subscriber connected"
    );

    let stream = futures::stream::unfold(subscriber, |mut subscriber| async move {
        let msg = subscriber.recv().await?;
        Some((Ok(SseEvent::default().data(msg)), subscriber))
    });

    Sse::new(stream).keep_alive(KeepAlive::default())
}

// ── Rules ───────────────────────────────────────────────────────

pub async fn rules_list(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let corpus = state.corpus.read().await;
    Json(json!({
        "count": corpus.len(),
        "rules": corpus.rules(),
    }))
}

/// Evaluate one event against the loaded corpus.
pub async fn rules_match(
    State(state): State<Arc<AppState>>,
    Json(event): Json<Event>,
) -> Json<serde_json::Value> {
    let corpus = state.corpus.read().await;
    let result = evaluate(&event, &corpus);
    Json(json!({ "matched": result }))
}

/// Re-scan the rules directory and swap the corpus.
pub async fn rules_reload(
    State(state): State<Arc<AppState>>,
) -> Result<Json<serde_json::Value>, (StatusCode, String)> {
    match Corpus::load(&state.rules_dir) {
        Ok(corpus) => {
            let count = corpus.len();
            *state.corpus.write().await = corpus;
            info!(count, "rule corpus reloaded");
            Ok(Json(json!({ "status": "reloaded", "count": count })))
        }
        Err(e) => {
            warn!(error = %e, "rule corpus reload failed");
            Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
        }
    }
}

// ── Introspection ───────────────────────────────────────────────

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "online",
        "service": "decoywatch",
        "endpoints": [
            "/api/v1/events",
            "/api/v1/events/stream",
            "/api/v1/rules",
        ],
    }))
}

pub async fn stats(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let rules = state.corpus.read().await.len();
    Json(json!({
        "subscribers": state.bus.subscriber_count(),
        "dropped_messages": state.bus.dropped_messages(),
        "rules": rules,
        "in_flight_runs": state.orchestrator.registry().in_flight(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_normalizes_single_event_to_batch() {
        let payload: EventPayload = serde_json::from_value(serde_json::json!({
            "event_kind": "cowrie.login.failed",
        }))
        .unwrap();
        let batch = payload.into_batch();
        assert_eq!(batch.len(), 1);
        assert_eq!(batch[0].event_kind.as_deref(), Some("cowrie.login.failed"));
    }

    #[test]
    fn payload_accepts_event_array() {
        let payload: EventPayload = serde_json::from_value(serde_json::json!([
            {"event_kind": "cowrie.session.connect"},
            {"event_kind": "cowrie.login.failed"},
        ]))
        .unwrap();
        assert_eq!(payload.into_batch().len(), 2);
    }
}
