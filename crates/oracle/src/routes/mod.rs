//! HTTP route handlers for Oracle.

use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::state::AppState;

mod admin;
mod error;
mod health;
mod puzzle;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health & Status
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/metrics", get(health::metrics))

        // Game endpoints
        .route("/puzzle", get(puzzle::get_puzzle))
        .route("/guess", post(puzzle::post_guess))
        .route("/solve", post(puzzle::post_solve))

        // Operator endpoints
        .nest("/admin", admin_routes())

        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )

        // Add shared state
        .with_state(state)
}

fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/reset", post(admin::reset_puzzle))
        .route("/stats", get(admin::get_stats))
}
