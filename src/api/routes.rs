//! HTTP API route definitions.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use axum::{extract::Query, routing::get, Router};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::warn;

use super::handlers::{
    health, list_endpoints, openapi_document, prometheus as prometheus_metrics, serve_endpoint,
    AppState,
};
use super::openapi::build_openapi;
use crate::loader::{Endpoint, EndpointSummary};
use crate::metrics;

/// Routes served by the application itself. Data files may not shadow them.
pub const RESERVED_ROUTES: [&str; 4] = ["/health", "/endpoints", "/openapi.json", "/metrics"];

/// Create the API router with one GET route per data endpoint.
///
/// Data routes are mounted under `prefix`; built-in routes are not. An
/// endpoint whose path is already taken, by a built-in route or an earlier
/// endpoint, is skipped.
pub fn create_router(
    endpoints: Vec<Endpoint>,
    prefix: &str,
    prometheus: Option<PrometheusHandle>,
) -> Router {
    let mut taken = HashSet::new();
    let endpoints: Vec<Endpoint> = endpoints
        .into_iter()
        .filter(|endpoint| {
            let path = format!("{prefix}{}", endpoint.route);
            if RESERVED_ROUTES.contains(&path.as_str()) {
                warn!("{} shadows a built-in route, skipping", endpoint.file.display());
                return false;
            }
            if !taken.insert(path) {
                warn!("{} duplicates an existing route, skipping", endpoint.file.display());
                return false;
            }
            true
        })
        .collect();

    let summaries = endpoints
        .iter()
        .map(|endpoint| EndpointSummary {
            route: format!("{prefix}{}", endpoint.route),
            ..endpoint.summary()
        })
        .collect();
    let mut state = AppState::new(summaries, build_openapi(&endpoints, prefix));
    if let Some(handle) = prometheus {
        state = state.with_prometheus(handle);
    }
    metrics::set_endpoints_registered(endpoints.len());

    let mut router = Router::new()
        .route("/health", get(health))
        .route("/endpoints", get(list_endpoints))
        .route("/openapi.json", get(openapi_document))
        .route("/metrics", get(prometheus_metrics));

    for endpoint in endpoints {
        let path = format!("{prefix}{}", endpoint.route);
        let endpoint = Arc::new(endpoint);
        router = router.route(
            &path,
            get(move |query: Query<HashMap<String, String>>| {
                serve_endpoint(Arc::clone(&endpoint), query)
            }),
        );
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
