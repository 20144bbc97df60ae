//! Process wiring: load the data directory and serve it.

use metrics_exporter_prometheus::PrometheusHandle;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::api::create_router;
use crate::config::Config;
use crate::error::Result;
use crate::loader::load_endpoints;
use crate::utils::shutdown_signal;

/// Serve `config.data_dir` until a shutdown signal arrives.
pub async fn run(config: &Config, prometheus: Option<PrometheusHandle>) -> Result<()> {
    info!("Loading data from {}", config.data_dir.display());
    let endpoints = load_endpoints(&config.data_dir)?;
    if endpoints.is_empty() {
        warn!("No JSON files found in {}", config.data_dir.display());
    }
    info!("Loaded {} endpoint(s)", endpoints.len());

    let router = create_router(endpoints, &config.route_prefix, prometheus);

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}
