//! Puzzle, guess and solve endpoints.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use pinhash_common::{Digest, GuessOutcome, SearchDomain, SearchOutcome, StatusView};

use super::error::ApiError;
use crate::state::{AppState, OracleStats};

#[derive(Serialize)]
pub struct PuzzleResponse {
    digest: Digest,
    algorithm: &'static str,
    /// False while the store is unavailable; the puzzle dies with the process
    persistent: bool,
    domain: SearchDomain,
    status: StatusView,
}

/// Show the current puzzle digest, generating one if needed
pub async fn get_puzzle(State(state): State<AppState>) -> Result<Json<PuzzleResponse>, ApiError> {
    let obtained = state.puzzle.secrets.obtain_or_degrade().await?;
    OracleStats::bump(&state.stats.puzzles_served);

    Ok(Json(PuzzleResponse {
        digest: obtained.digest,
        algorithm: state.puzzle.secrets.algorithm(),
        persistent: obtained.persistent,
        domain: state.puzzle.domain(),
        status: StatusView::prompt(),
    }))
}

#[derive(Deserialize)]
pub struct GuessRequest {
    guess: String,
}

#[derive(Serialize)]
pub struct GuessResponse {
    outcome: GuessOutcome,
    status: StatusView,
}

/// Check a guess against the current puzzle
///
/// Returns:
/// - 200: `match` or `no_match`
/// - 400: `invalid` (not exactly three digits; nothing was hashed)
pub async fn post_guess(
    State(state): State<AppState>,
    Json(payload): Json<GuessRequest>,
) -> Result<(StatusCode, Json<GuessResponse>), ApiError> {
    let obtained = state.puzzle.secrets.obtain_or_degrade().await?;
    let outcome = state
        .puzzle
        .evaluator
        .evaluate(payload.guess.trim(), &obtained.digest)?;

    OracleStats::bump(&state.stats.guesses);
    let code = match outcome {
        GuessOutcome::Match => {
            OracleStats::bump(&state.stats.guesses_matched);
            StatusCode::OK
        }
        GuessOutcome::NoMatch => StatusCode::OK,
        GuessOutcome::Invalid => {
            OracleStats::bump(&state.stats.guesses_invalid);
            StatusCode::BAD_REQUEST
        }
    };

    Ok((
        code,
        Json(GuessResponse {
            outcome,
            status: StatusView::for_guess(outcome),
        }),
    ))
}

#[derive(Deserialize, Default)]
pub struct SolveRequest {
    /// Digest to crack instead of the current puzzle
    digest: Option<String>,
}

#[derive(Serialize)]
pub struct SolveResponse {
    #[serde(flatten)]
    outcome: SearchOutcome,
    domain: SearchDomain,
    status: StatusView,
}

/// Brute-force the current puzzle (or a supplied digest)
///
/// `not_found` is an ordinary 200 response with a failure status; a broken
/// digest primitive is a 500.
pub async fn post_solve(
    State(state): State<AppState>,
    payload: Option<Json<SolveRequest>>,
) -> Result<Json<SolveResponse>, ApiError> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();
    let target: Digest = match request.digest {
        Some(hex) => hex.parse()?,
        None => state.puzzle.secrets.obtain_or_degrade().await?.digest,
    };

    let handle = state.register_search().await;
    OracleStats::bump(&state.stats.searches_run);
    tracing::debug!(digest = %target, "{}", StatusView::in_progress().message);

    let result = state.puzzle.engine.search_with(&target, &handle).await;
    state.finish_search(&handle).await;
    let outcome = result?;

    if let SearchOutcome::Cancelled { attempts } = outcome {
        OracleStats::bump(&state.stats.searches_cancelled);
        tracing::info!(attempts, "Solve cancelled");
    }

    Ok(Json(SolveResponse {
        outcome,
        domain: state.puzzle.domain(),
        status: StatusView::for_search(outcome),
    }))
}
