//! HTTP server for stylistd

use crate::metrics::StylistMetrics;
use crate::orchestrator::Orchestrator;
use crate::routes;
use anyhow::Result;
use axum::http::{HeaderValue, Method};
use axum::Router;
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Application state shared across handlers
pub struct AppState {
    pub orchestrator: Orchestrator,
    pub metrics: Arc<StylistMetrics>,
    pub oracle_enabled: bool,
    pub start_time: Instant,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator, metrics: Arc<StylistMetrics>) -> Self {
        Self {
            orchestrator,
            metrics,
            oracle_enabled: false,
            start_time: Instant::now(),
        }
    }

    pub fn with_oracle_enabled(mut self, enabled: bool) -> Self {
        self.oracle_enabled = enabled;
        self
    }
}

/// Browser origins served from the local machine
fn is_local_origin(origin: &HeaderValue) -> bool {
    origin.as_bytes().starts_with(b"http://localhost")
        || origin.as_bytes().starts_with(b"http://127.0.0.1")
}

/// Full router with middleware
pub fn app(state: AppState, max_body_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::predicate(|origin, _| is_local_origin(origin)))
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([axum::http::header::CONTENT_TYPE]);

    Router::new()
        .merge(routes::chat_routes())
        .merge(routes::search_routes())
        .merge(routes::outfit_routes())
        .merge(routes::health_routes())
        .with_state(Arc::new(state))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Run the HTTP server
pub async fn run(state: AppState, bind: &str, max_body_bytes: usize) -> Result<()> {
    let app = app(state, max_body_bytes);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("  Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_origins() {
        assert!(is_local_origin(&HeaderValue::from_static("http://localhost:3000")));
        assert!(is_local_origin(&HeaderValue::from_static("http://127.0.0.1:5173")));
        assert!(!is_local_origin(&HeaderValue::from_static("https://evil.example")));
    }
}
