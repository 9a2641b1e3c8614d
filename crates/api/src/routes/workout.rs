//! Route definitions for workout generation.
//!
//! Mounted at `/workout`.
//!
//! ```text
//! GET    /              current_workout (?date)
//! GET    /preview       preview_workout (?week, day, date)
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::workout;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(workout::current_workout))
        .route("/preview", get(workout::preview_workout))
}
