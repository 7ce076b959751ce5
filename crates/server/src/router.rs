//! HTTP router construction.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api;
use crate::state::AppState;

/// Build the application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(api::health))
        .route("/stats", get(api::stats))
        .route("/api/v1/events", post(api::ingest))
        .route("/api/v1/events/stream", get(api::stream_events))
        .route("/api/v1/rules", get(api::rules_list))
        .route("/api/v1/rules/match", post(api::rules_match))
        .route("/api/v1/rules/reload", post(api::rules_reload))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
