//! Operator endpoints: reset and stats.

use axum::{Json, extract::State};
use serde::Serialize;

use pinhash_common::{PinHashError, SearchDomain, StatusView};

use super::error::ApiError;
use crate::state::{AppState, OracleStats, OracleStatsSnapshot};

#[derive(Serialize)]
pub struct ResetResponse {
    cancelled_searches: usize,
    /// False when the durable store could not be cleared
    persistent: bool,
    status: StatusView,
}

/// Cancel running solves and forget the current puzzle
pub async fn reset_puzzle(State(state): State<AppState>) -> Result<Json<ResetResponse>, ApiError> {
    let cancelled_searches = state.cancel_searches().await;

    let persistent = match state.puzzle.secrets.reset().await {
        Ok(()) => true,
        Err(PinHashError::PersistenceUnavailable(reason)) => {
            tracing::warn!(reason = %reason, "Reset could not reach the store");
            false
        }
        Err(e) => return Err(e.into()),
    };

    OracleStats::bump(&state.stats.resets);
    tracing::info!(cancelled_searches, persistent, "Puzzle reset via admin");

    Ok(Json(ResetResponse {
        cancelled_searches,
        persistent,
        status: StatusView::prompt(),
    }))
}

#[derive(Serialize)]
pub struct StatsResponse {
    store: &'static str,
    algorithm: &'static str,
    domain: SearchDomain,
    uptime_secs: u64,
    in_flight_searches: usize,
    counters: OracleStatsSnapshot,
}

pub async fn get_stats(State(state): State<AppState>) -> Json<StatsResponse> {
    let in_flight_searches = state.searches.lock().await.len();

    Json(StatsResponse {
        store: state.puzzle.secrets.backend(),
        algorithm: state.puzzle.secrets.algorithm(),
        domain: state.puzzle.domain(),
        uptime_secs: state.started_at.elapsed().as_secs(),
        in_flight_searches,
        counters: state.stats.snapshot(),
    })
}
