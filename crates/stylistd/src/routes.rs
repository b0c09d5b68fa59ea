//! API routes for stylistd

use crate::server::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use stylist_common::{
    reply, HealthResponse, OutfitResponse, SearchRequest, SearchResponse, TurnRequest,
    TurnResponse, UserId, VERSION,
};
use tracing::{info, warn};

type AppStateArc = Arc<AppState>;

// ============================================================================
// Chat Routes
// ============================================================================

pub fn chat_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/", get(index))
        .route("/chat", post(chat))
}

async fn index() -> &'static str {
    "stylistd: POST /chat, POST /v1/search, GET /v1/outfit/:user_id, GET /v1/health, GET /metrics\n"
}

/// Turn API. Always answers with a `TurnResponse`, even for malformed bodies.
async fn chat(
    State(state): State<AppStateArc>,
    body: Result<Json<TurnRequest>, JsonRejection>,
) -> (StatusCode, Json<TurnResponse>) {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            warn!("  Rejected chat body: {}", rejection.body_text());
            return (
                rejection.status(),
                Json(TurnResponse::failure(UserId::default(), reply::APOLOGY)),
            );
        }
    };

    info!("  Chat turn for user {}", req.user_id);
    let response = state.orchestrator.handle_turn(&req.prompt, req.user_id).await;
    (StatusCode::OK, Json(response))
}

// ============================================================================
// Search Routes
// ============================================================================

pub fn search_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/search", post(search))
}

async fn search(
    State(state): State<AppStateArc>,
    Json(req): Json<SearchRequest>,
) -> Json<SearchResponse> {
    Json(state.orchestrator.search(&req.prompt, req.limit).await)
}

// ============================================================================
// Outfit Routes
// ============================================================================

pub fn outfit_routes() -> Router<AppStateArc> {
    Router::new().route("/v1/outfit/:user_id", get(outfit))
}

async fn outfit(
    State(state): State<AppStateArc>,
    Path(user_id): Path<String>,
) -> Json<OutfitResponse> {
    Json(state.orchestrator.outfit(UserId::from(user_id.as_str())).await)
}

// ============================================================================
// Health Routes
// ============================================================================

pub fn health_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/v1/health", get(health))
        .route("/metrics", get(metrics))
}

async fn health(State(state): State<AppStateArc>) -> Json<HealthResponse> {
    let sessions = state.orchestrator.sessions().len().await;
    state.metrics.set_active_sessions(sessions);

    Json(HealthResponse {
        status: "ok".to_string(),
        version: VERSION.to_string(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
        sessions,
        oracle_enabled: state.oracle_enabled,
    })
}

async fn metrics(State(state): State<AppStateArc>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.export(),
    )
}
