//! # Metrics Collection Module
//!
//! Prometheus export of pipeline counters, rendered at `GET /metrics`.
//!
//! ## Metrics Tracked
//!
//! **Counters:**
//! - `symcheck_requests_total{kind, status}` - Analyses by outcome
//! - `symcheck_cache_hits_total{kind}` - Responses served from the cache
//! - `symcheck_cache_misses_total{kind}` - Cache lookups that fell through to the model
//! - `symcheck_rate_limited_total` - Requests rejected by the rate limiter
//! - `symcheck_errors_total{error_type}` - Failures by taxonomy label
//!
//! **Gauges:**
//! - `symcheck_uptime_seconds` - Refreshed on every scrape
//!
//! **Histograms:**
//! - `symcheck_upstream_duration_seconds{kind}` - Model provider call latency

pub mod handler;

// Re-export PrometheusBuilder for test compatibility
pub use metrics_exporter_prometheus::PrometheusBuilder;

use metrics_exporter_prometheus::PrometheusHandle;
use std::time::{Duration, Instant};

pub const REQUESTS_TOTAL: &str = "symcheck_requests_total";
pub const CACHE_HITS_TOTAL: &str = "symcheck_cache_hits_total";
pub const CACHE_MISSES_TOTAL: &str = "symcheck_cache_misses_total";
pub const RATE_LIMITED_TOTAL: &str = "symcheck_rate_limited_total";
pub const UPSTREAM_DURATION_SECONDS: &str = "symcheck_upstream_duration_seconds";
pub const ERRORS_TOTAL: &str = "symcheck_errors_total";
pub const UPTIME_SECONDS: &str = "symcheck_uptime_seconds";

/// Holds the Prometheus handle and process start time.
pub struct MetricsCollector {
    start_time: Instant,
    prometheus_handle: PrometheusHandle,
}

impl MetricsCollector {
    pub fn new(start_time: Instant, prometheus_handle: PrometheusHandle) -> Self {
        Self {
            start_time,
            prometheus_handle,
        }
    }

    /// Install the global recorder, or fall back to a detached one when a
    /// recorder is already installed (e.g. several routers in one test binary).
    pub fn install(start_time: Instant) -> Self {
        let handle = setup_metrics().unwrap_or_else(|e| {
            tracing::debug!("Metrics already initialized, creating new handle: {}", e);
            PrometheusBuilder::new().build_recorder().handle()
        });
        Self::new(start_time, handle)
    }

    /// Get uptime in seconds since server startup.
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Publish the current uptime before a scrape.
    pub fn refresh_uptime(&self) {
        metrics::gauge!(UPTIME_SECONDS).set(self.uptime_seconds() as f64);
    }

    /// Render Prometheus metrics in text format.
    pub fn render_metrics(&self) -> String {
        self.prometheus_handle.render()
    }
}

/// Initialize Prometheus metrics exporter with custom histogram buckets.
///
/// Upstream latency buckets follow chat-completion response times:
/// [0.1, 0.25, 0.5, 1, 2, 5, 10, 20, 30, 60] seconds.
pub fn setup_metrics() -> Result<PrometheusHandle, Box<dyn std::error::Error>> {
    use metrics_exporter_prometheus::Matcher;

    let duration_buckets = &[0.1, 0.25, 0.5, 1.0, 2.0, 5.0, 10.0, 20.0, 30.0, 60.0];

    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            Matcher::Full(UPSTREAM_DURATION_SECONDS.to_string()),
            duration_buckets,
        )?
        .install_recorder()?;

    Ok(handle)
}

/// Count one finished analysis. `status` is `"success"` or an error label.
pub fn record_request(kind: &'static str, status: &'static str) {
    metrics::counter!(REQUESTS_TOTAL, "kind" => kind, "status" => status).increment(1);
    if status != "success" {
        metrics::counter!(ERRORS_TOTAL, "error_type" => status).increment(1);
    }
}

pub fn record_cache_lookup(kind: &'static str, hit: bool) {
    if hit {
        metrics::counter!(CACHE_HITS_TOTAL, "kind" => kind).increment(1);
    } else {
        metrics::counter!(CACHE_MISSES_TOTAL, "kind" => kind).increment(1);
    }
}

pub fn record_rate_limited() {
    metrics::counter!(RATE_LIMITED_TOTAL).increment(1);
}

pub fn record_upstream_duration(kind: &'static str, elapsed: Duration) {
    metrics::histogram!(UPSTREAM_DURATION_SECONDS, "kind" => kind).record(elapsed.as_secs_f64());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Mutex, Once};

    static INIT: Once = Once::new();
    static TEST_HANDLE: Mutex<Option<PrometheusHandle>> = Mutex::new(None);

    fn get_test_handle() -> PrometheusHandle {
        INIT.call_once(|| {
            // Use build_recorder which doesn't need a runtime
            let recorder = PrometheusBuilder::new().build_recorder();
            let handle = recorder.handle();
            *TEST_HANDLE.lock().unwrap() = Some(handle);

            // Install the recorder globally (only once for all tests)
            metrics::set_global_recorder(Box::new(recorder)).ok();
        });

        TEST_HANDLE.lock().unwrap().as_ref().unwrap().clone()
    }

    #[test]
    fn test_metrics_collector_construction() {
        let collector = MetricsCollector::new(Instant::now(), get_test_handle());
        assert!(collector.uptime_seconds() < 1);
    }

    #[test]
    fn test_recorded_metrics_render() {
        let collector = MetricsCollector::new(Instant::now(), get_test_handle());

        record_request("diseases", "success");
        record_request("treatments", "upstream");
        record_cache_lookup("diseases", true);
        record_cache_lookup("trending", false);
        record_rate_limited();

        let output = collector.render_metrics();
        assert!(output.contains(REQUESTS_TOTAL));
        assert!(output.contains("status=\"upstream\""));
        assert!(output.contains(ERRORS_TOTAL));
        assert!(output.contains(CACHE_HITS_TOTAL));
        assert!(output.contains(CACHE_MISSES_TOTAL));
        assert!(output.contains(RATE_LIMITED_TOTAL));
    }

    #[test]
    fn test_refresh_uptime_publishes_gauge() {
        let collector = MetricsCollector::new(Instant::now(), get_test_handle());
        collector.refresh_uptime();
        assert!(collector.render_metrics().contains(UPTIME_SECONDS));
    }

    #[test]
    fn test_success_is_not_an_error() {
        let collector = MetricsCollector::new(Instant::now(), get_test_handle());
        record_request("trending", "success");

        let output = collector.render_metrics();
        assert!(!output.contains("error_type=\"success\""));
    }
}
