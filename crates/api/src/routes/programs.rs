//! Route definitions nested under a program.
//!
//! Mounted at `/programs`.
//!
//! ```text
//! POST   /{id}/enroll           enroll
//! POST   /{id}/progressions     link_progression (admin)
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::{enrollment, progressions};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}/enroll", post(enrollment::enroll))
        .route("/{id}/progressions", post(progressions::link_progression))
}
