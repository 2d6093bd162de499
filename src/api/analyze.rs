//! `POST /api/analyze` handler.

use super::{ApiError, AppState};
use crate::logging::{request_id_from, REQUEST_ID_HEADER};
use crate::rate_limit::client_id;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::{info_span, Instrument};

/// Response header reporting whether the result came from the cache.
pub const CACHE_HEADER: &str = "x-symcheck-cache";

/// POST /api/analyze - Run one analysis.
///
/// Every response, success or error, carries the request ID in `x-request-id`,
/// echoing a well-formed inbound one.
pub async fn handle(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Response {
    let request_id = request_id_from(&headers);
    let span = info_span!("analyze", request_id = %request_id);

    let mut response = match analyze(&state, &headers, payload).instrument(span).await {
        Ok(response) => response,
        Err(error) => error.into_response(),
    };

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

async fn analyze(
    state: &AppState,
    headers: &HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected request body");
        crate::metrics::record_request("invalid", "validation");
        ApiError::invalid_body(&rejection)
    })?;

    let limiter = state.analyzer.rate_limiter();
    let client = client_id(headers, limiter.client_header());

    let analysis = state.analyzer.analyze(&body, Some(&client)).await?;

    let cache = if analysis.cache_hit { "hit" } else { "miss" };
    let mut response = Json(analysis.result).into_response();
    response
        .headers_mut()
        .insert(CACHE_HEADER, HeaderValue::from_static(cache));
    Ok(response)
}
