//! Route definitions for prescriptions and ad-hoc resolution.
//!
//! ```text
//! PRESCRIPTIONS (mounted at /prescriptions):
//! POST   /                  create_prescription (admin)
//! POST   /resolve           resolve_prescriptions (batch)
//! GET    /{id}/resolve      resolve_prescription (?date)
//!
//! LOAD STRATEGIES (mounted at /load-strategies):
//! POST   /resolve           resolve_load_strategy
//!
//! SET SCHEMES (mounted at /set-schemes):
//! POST   /generate          generate_set_scheme
//! ```

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::prescriptions;
use crate::state::AppState;

/// Prescription routes -- mounted at `/prescriptions`.
pub fn prescription_router() -> Router<AppState> {
    Router::new()
        .route("/", post(prescriptions::create_prescription))
        .route("/resolve", post(prescriptions::resolve_prescriptions))
        .route("/{id}/resolve", get(prescriptions::resolve_prescription))
}

/// Load strategy routes -- mounted at `/load-strategies`.
pub fn load_strategy_router() -> Router<AppState> {
    Router::new().route("/resolve", post(prescriptions::resolve_load_strategy))
}

/// Set scheme routes -- mounted at `/set-schemes`.
pub fn set_scheme_router() -> Router<AppState> {
    Router::new().route("/generate", post(prescriptions::generate_set_scheme))
}
