//! Prometheus metrics for endpoint traffic.
//!
//! This module provides metrics for:
//! - Requests served per endpoint
//! - Query binding failures per endpoint
//! - Time spent producing a response
//! - Number of registered endpoints

use std::time::Instant;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// Requests served counter metric name.
pub const METRIC_ENDPOINT_REQUESTS: &str = "endpoint_requests_total";
/// Query binding failures counter metric name.
pub const METRIC_ENDPOINT_BIND_ERRORS: &str = "endpoint_bind_errors_total";
/// Response production latency metric name.
pub const METRIC_ENDPOINT_FILTER_LATENCY: &str = "endpoint_filter_latency_ms";
/// Registered endpoints gauge metric name.
pub const METRIC_ENDPOINTS_REGISTERED: &str = "endpoints_registered";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_counter!(
        METRIC_ENDPOINT_REQUESTS,
        "Total number of requests served per endpoint"
    );
    describe_counter!(
        METRIC_ENDPOINT_BIND_ERRORS,
        "Total number of requests rejected for invalid query parameters"
    );
    describe_histogram!(
        METRIC_ENDPOINT_FILTER_LATENCY,
        "Time to produce an endpoint response in milliseconds"
    );
    describe_gauge!(
        METRIC_ENDPOINTS_REGISTERED,
        "Number of endpoints loaded from the data directory"
    );

    debug!("Metrics initialized");
}

/// Install the global Prometheus recorder and return its render handle.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Increment requests counter for an endpoint.
pub fn inc_endpoint_requests(endpoint: &str) {
    counter!(METRIC_ENDPOINT_REQUESTS, "endpoint" => endpoint.to_string()).increment(1);
}

/// Increment bind errors counter for an endpoint.
pub fn inc_endpoint_bind_errors(endpoint: &str) {
    counter!(METRIC_ENDPOINT_BIND_ERRORS, "endpoint" => endpoint.to_string()).increment(1);
}

/// Record the number of registered endpoints.
pub fn set_endpoints_registered(count: usize) {
    gauge!(METRIC_ENDPOINTS_REGISTERED).set(count as f64);
}

/// Record response latency for an endpoint.
pub fn record_filter_latency(start: Instant, endpoint: &str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_ENDPOINT_FILTER_LATENCY, "endpoint" => endpoint.to_string())
        .record(latency_ms);
}
