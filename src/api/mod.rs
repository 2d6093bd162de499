//! # HTTP API
//!
//! Endpoints served by `symcheck serve`.
//!
//! ## Endpoints
//!
//! - `POST /api/analyze` - Possible diseases, treatments, or trending symptoms
//! - `GET /health` - Liveness, version, and uptime
//! - `GET /metrics` - Prometheus metrics
//!
//! ## Example
//!
//! ```no_run
//! use symcheck::api::{create_router, AppState};
//! use symcheck::config::SymcheckConfig;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Arc::new(SymcheckConfig::default());
//! let state = Arc::new(AppState::from_config(config)?);
//! let app = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Errors are returned as a flat JSON object:
//! ```json
//! {
//!   "error": "Failed to analyze symptoms",
//!   "details": "Model provider error: 503 - Service unavailable",
//!   "suggestion": "Please try again later"
//! }
//! ```
//!
//! 400 for invalid payloads, 429 when rate limited (with `Retry-After`),
//! 500 for missing configuration, upstream failures, and unusable replies.

mod analyze;
mod health;
pub mod types;

pub use analyze::CACHE_HEADER;
pub use health::HealthResponse;
pub use types::*;

use crate::config::SymcheckConfig;
use crate::metrics::MetricsCollector;
use crate::pipeline::Analyzer;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::limit::RequestBodyLimitLayer;

/// Shared application state accessible to all handlers.
pub struct AppState {
    pub config: Arc<SymcheckConfig>,
    pub analyzer: Arc<Analyzer>,
    /// Server startup time for uptime tracking
    pub start_time: Instant,
    /// Metrics collector for observability
    pub metrics_collector: Arc<MetricsCollector>,
}

impl AppState {
    /// Create application state around an existing analyzer.
    pub fn new(config: Arc<SymcheckConfig>, analyzer: Arc<Analyzer>) -> Self {
        let start_time = Instant::now();
        // Safe to call multiple times: later calls get a detached recorder
        let metrics_collector = Arc::new(MetricsCollector::install(start_time));

        Self {
            config,
            analyzer,
            start_time,
            metrics_collector,
        }
    }

    /// Create application state with the configured model provider.
    pub fn from_config(config: Arc<SymcheckConfig>) -> Result<Self, reqwest::Error> {
        let analyzer = Arc::new(Analyzer::from_config(&config)?);
        Ok(Self::new(config, analyzer))
    }
}

/// Create the main API router with all endpoints configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    let body_limit = state.config.server.max_body_bytes;

    Router::new()
        .route("/api/analyze", post(analyze::handle))
        .route("/health", get(health::handle))
        .route("/metrics", get(crate::metrics::handler::metrics_handler))
        .layer(RequestBodyLimitLayer::new(body_limit))
        .with_state(state)
}
