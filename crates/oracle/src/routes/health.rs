//! Health check endpoints.

use axum::{Json, extract::State, http::StatusCode};
use serde::Serialize;

use crate::state::{AppState, OracleStatsSnapshot};

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Basic health check (is the server running?)
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Serialize)]
pub struct ReadyResponse {
    status: &'static str,
    store: &'static str,
}

/// Readiness check (is the durable store reachable?)
///
/// A 503 here does not stop the game: puzzles fall back to session-only.
pub async fn ready_check(State(state): State<AppState>) -> Result<Json<ReadyResponse>, StatusCode> {
    let backend = state.puzzle.secrets.backend();

    match state.puzzle.secrets.ping_store().await {
        Ok(()) => Ok(Json(ReadyResponse {
            status: "ready",
            store: backend,
        })),
        Err(e) => {
            tracing::warn!(store = backend, error = %e, "Store not ready");
            Err(StatusCode::SERVICE_UNAVAILABLE)
        }
    }
}

#[derive(Serialize)]
pub struct MetricsResponse {
    uptime_secs: u64,
    in_flight_searches: usize,
    #[serde(flatten)]
    counters: OracleStatsSnapshot,
}

/// Metrics endpoint (for monitoring)
pub async fn metrics(State(state): State<AppState>) -> Json<MetricsResponse> {
    let in_flight_searches = state.searches.lock().await.len();

    Json(MetricsResponse {
        uptime_secs: state.started_at.elapsed().as_secs(),
        in_flight_searches,
        counters: state.stats.snapshot(),
    })
}
