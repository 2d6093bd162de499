//! `GET /metrics`

use crate::api::AppState;
use axum::{extract::State, http::header, response::IntoResponse};
use std::sync::Arc;

/// Prometheus text exposition content type.
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Render all recorded metrics, refreshing the uptime gauge first.
///
/// Returns 200 with an empty body before anything has been recorded.
pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.metrics_collector.refresh_uptime();
    (
        [(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)],
        state.metrics_collector.render_metrics(),
    )
}
