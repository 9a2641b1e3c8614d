//! Route definitions for progressions.
//!
//! ```text
//! PROGRESSIONS (mounted at /progressions):
//! POST   /                  create_progression (admin)
//! POST   /{id}/trigger      trigger_progression
//!
//! HISTORY (mounted at /progression-history):
//! GET    /                  list_history (?lift_id, limit, offset)
//! ```
//!
//! Program links live under `/programs`, see [`super::programs`].

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::progressions;
use crate::state::AppState;

/// Progression routes -- mounted at `/progressions`.
pub fn progression_router() -> Router<AppState> {
    Router::new()
        .route("/", post(progressions::create_progression))
        .route("/{id}/trigger", post(progressions::trigger_progression))
}

/// History routes -- mounted at `/progression-history`.
pub fn history_router() -> Router<AppState> {
    Router::new().route("/", get(progressions::list_history))
}
