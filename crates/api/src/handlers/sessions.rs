//! Handlers for workout sessions and logged sets.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use liftcycle_core::types::{Date, DbId};
use liftcycle_db::models::session::CreateLoggedSet;

use crate::engine::session;
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::today;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct NextSetParams {
    pub prescription_id: DbId,
    pub date: Option<Date>,
}

// ---------------------------------------------------------------------------
// POST /sessions
// ---------------------------------------------------------------------------

/// Start a session at the current position. One open session at a time.
pub async fn start_session(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let created = session::start(&state.pool, auth.user_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /sessions/{id}
// ---------------------------------------------------------------------------

pub async fn get_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = session::detail(&state.pool, auth.user_id, id).await?;
    Ok(Json(DataResponse { data: detail }))
}

// ---------------------------------------------------------------------------
// POST /sessions/{id}/sets
// ---------------------------------------------------------------------------

pub async fn log_set(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CreateLoggedSet>,
) -> AppResult<impl IntoResponse> {
    let set = session::log_set(&state.pool, auth.user_id, id, &input).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: set })))
}

// ---------------------------------------------------------------------------
// GET /sessions/{id}/next-set
// ---------------------------------------------------------------------------

/// Next set of a variable scheme (MRS, fatigue drop) given what was logged.
pub async fn next_set(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<NextSetParams>,
) -> AppResult<impl IntoResponse> {
    let result = session::next_set_for(
        &state.pool,
        auth.user_id,
        id,
        params.prescription_id,
        params.date.unwrap_or_else(today),
    )
    .await?;
    Ok(Json(DataResponse { data: result }))
}

// ---------------------------------------------------------------------------
// POST /sessions/{id}/finish, /abandon
// ---------------------------------------------------------------------------

/// Complete the session and fire AFTER_SESSION progressions.
pub async fn finish_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let outcome = session::finish(&state.pool, auth.user_id, id).await?;
    Ok(Json(DataResponse { data: outcome }))
}

pub async fn abandon_session(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let closed = session::abandon(&state.pool, auth.user_id, id).await?;
    Ok(Json(DataResponse { data: closed }))
}
