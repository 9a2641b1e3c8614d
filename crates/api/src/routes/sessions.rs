//! Route definitions for workout sessions.
//!
//! Mounted at `/sessions`.
//!
//! ```text
//! POST   /                  start_session
//! GET    /{id}              get_session
//! POST   /{id}/sets         log_set
//! GET    /{id}/next-set     next_set (?prescription_id, date)
//! POST   /{id}/finish       finish_session
//! POST   /{id}/abandon      abandon_session
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::sessions;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(sessions::start_session))
        .route("/{id}", get(sessions::get_session))
        .route("/{id}/sets", post(sessions::log_set))
        .route("/{id}/next-set", get(sessions::next_set))
        .route("/{id}/finish", post(sessions::finish_session))
        .route("/{id}/abandon", post(sessions::abandon_session))
}
