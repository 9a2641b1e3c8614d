//! Route definitions for lift maxes.
//!
//! Mounted at `/maxes`.
//!
//! ```text
//! GET    /              list_maxes (?lift_id)
//! POST   /              create_max
//! GET    /current       current_max (?lift_id, max_type, as_of)
//! PUT    /{id}          update_max
//! ```

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::maxes;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(maxes::list_maxes).post(maxes::create_max))
        .route("/current", get(maxes::current_max))
        .route("/{id}", put(maxes::update_max))
}
