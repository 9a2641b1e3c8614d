//! Handlers for program enrollment and schedule advancement.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use liftcycle_core::types::DbId;

use crate::engine::enrollment::{self, Advance};
use crate::error::AppResult;
use crate::middleware::rbac::RequireAuth;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// POST /programs/{id}/enroll
// ---------------------------------------------------------------------------

/// Enroll in a program, replacing any current enrollment.
pub async fn enroll(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
    Path(program_id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let view = enrollment::enroll(&state.pool, auth.user_id, program_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: view })))
}

// ---------------------------------------------------------------------------
// GET /enrollment
// ---------------------------------------------------------------------------

pub async fn get_enrollment(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let view = enrollment::current(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: view }))
}

// ---------------------------------------------------------------------------
// DELETE /enrollment
// ---------------------------------------------------------------------------

pub async fn unenroll(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    enrollment::unenroll(&state.pool, auth.user_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// POST /enrollment/advance-week, /advance-day, /next-cycle
// ---------------------------------------------------------------------------

async fn advance(state: AppState, user_id: DbId, op: Advance) -> AppResult<impl IntoResponse> {
    let outcome = enrollment::advance(&state.pool, user_id, op).await?;
    Ok(Json(DataResponse { data: outcome }))
}

/// Complete the current week. Fires AFTER_WEEK (and cycle) progressions.
pub async fn advance_week(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    advance(state, auth.user_id, Advance::Week).await
}

/// Move to the next training day, rolling into the next week after the last.
pub async fn advance_day(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    advance(state, auth.user_id, Advance::Day).await
}

/// Start the next cycle iteration from BETWEEN_CYCLES.
pub async fn next_cycle(
    RequireAuth(auth): RequireAuth,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    advance(state, auth.user_id, Advance::NextCycle).await
}
