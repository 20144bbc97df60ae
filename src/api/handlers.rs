//! HTTP API handlers.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use tracing::debug;
use utoipa::openapi::OpenApi;

use crate::loader::{Endpoint, EndpointSummary};
use crate::metrics;
use crate::source::FilterParams;

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// Description of every registered data endpoint.
    pub endpoints: Arc<Vec<EndpointSummary>>,
    /// Generated OpenAPI document.
    pub openapi: Arc<OpenApi>,
    /// Prometheus render handle, when metrics are enabled.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state.
    pub fn new(endpoints: Vec<EndpointSummary>, openapi: OpenApi) -> Self {
        Self {
            endpoints: Arc::new(endpoints),
            openapi: Arc::new(openapi),
            prometheus: None,
        }
    }

    /// Attach a Prometheus handle for the /metrics route.
    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("endpoints", &self.endpoints.len())
            .field("metrics", &self.prometheus.is_some())
            .finish()
    }
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Status: "ok".
    pub status: &'static str,
    /// Number of data endpoints served.
    pub endpoints: usize,
}

/// Health check handler - always returns 200.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        endpoints: state.endpoints.len(),
    })
}

/// Index handler - lists every data endpoint and its filterable fields.
pub async fn list_endpoints(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.endpoints.as_ref().clone())
}

/// OpenAPI document handler.
pub async fn openapi_document(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.openapi.as_ref().clone())
}

/// Prometheus exposition handler - 404 when metrics are disabled.
pub async fn prometheus(State(state): State<AppState>) -> Response {
    match &state.prometheus {
        Some(handle) => (StatusCode::OK, handle.render()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Serve one data endpoint.
///
/// Query parameters are bound against the endpoint's filter schema before
/// the handler runs; binding failures answer 422. Decode failures and data
/// both answer 200.
pub async fn serve_endpoint(
    endpoint: Arc<Endpoint>,
    Query(raw): Query<HashMap<String, String>>,
) -> Response {
    let start = Instant::now();
    let name = endpoint.name();
    metrics::inc_endpoint_requests(name);

    let params = match endpoint.handler.schema() {
        Some(schema) => match schema.bind(&raw) {
            Ok(params) => params,
            Err(e) => {
                debug!(endpoint = %name, error = %e, "Rejected query");
                metrics::inc_endpoint_bind_errors(name);
                return e.into_response();
            }
        },
        None => FilterParams::default(),
    };

    let body = endpoint.handler.call(&params);
    debug!(
        endpoint = %name,
        filters = params.assigned().count(),
        items = ?body.as_array().map(Vec::len),
        "Served endpoint"
    );
    metrics::record_filter_latency(start, name);

    Json(body).into_response()
}
