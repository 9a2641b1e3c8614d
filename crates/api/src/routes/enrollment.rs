//! Route definitions for the caller's enrollment.
//!
//! Mounted at `/enrollment`.
//!
//! ```text
//! GET    /                  get_enrollment
//! DELETE /                  unenroll
//! POST   /advance-week      advance_week
//! POST   /advance-day       advance_day
//! POST   /next-cycle        next_cycle
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::enrollment;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(enrollment::get_enrollment).delete(enrollment::unenroll),
        )
        .route("/advance-week", post(enrollment::advance_week))
        .route("/advance-day", post(enrollment::advance_day))
        .route("/next-cycle", post(enrollment::next_cycle))
}
