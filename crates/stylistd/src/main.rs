//! Stylist Daemon - conversational outfit assistant
//!
//! Serves the Turn API over HTTP and keeps per-user outfit sessions in memory.

use anyhow::{Context, Result};
use std::sync::Arc;
use stylistd::catalog::HttpCatalogClient;
use stylistd::config::Config;
use stylistd::metrics::StylistMetrics;
use stylistd::oracle::HttpOracle;
use stylistd::orchestrator::Orchestrator;
use stylistd::server::{self, AppState};
use stylistd::sessions::SessionStore;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("stylistd=info,tower_http=info")),
        )
        .init();

    info!("Stylist Daemon v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::load();
    let metrics = Arc::new(StylistMetrics::new().context("Failed to register metrics")?);

    let catalog = HttpCatalogClient::new(&config.catalog, Some(metrics.clone()))?;
    info!(
        "  Catalog: {} (timeout {}s, {} attempts)",
        config.catalog.url, config.catalog.timeout_secs, config.catalog.max_attempts
    );

    let mut orchestrator = Orchestrator::new(Arc::new(catalog), Arc::new(SessionStore::new()))
        .with_metrics(metrics.clone());

    let oracle = HttpOracle::new(config.oracle.clone())?;
    let oracle_enabled = oracle.is_active();
    if oracle_enabled {
        info!("  Oracle: {} via {}", config.oracle.model, config.oracle.endpoint);
        orchestrator = orchestrator.with_oracle(Arc::new(oracle));
    } else {
        info!("  Oracle disabled, deterministic planning only");
    }

    let state = AppState::new(orchestrator, metrics).with_oracle_enabled(oracle_enabled);

    tokio::select! {
        result = server::run(state, &config.server.bind, config.server.max_body_bytes) => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down gracefully"),
    }

    Ok(())
}
