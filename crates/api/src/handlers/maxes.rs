//! Handlers for a user's lift max history.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use liftcycle_core::error::CoreError;
use liftcycle_core::lift_max::{validate_max_value, MaxType};
use liftcycle_core::types::{Date, DbId};
use liftcycle_db::models::lift_max::{CreateLiftMax, UpdateLiftMax};
use liftcycle_db::repositories::{LiftMaxRepo, LiftRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::today;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Query parameters
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ListMaxesParams {
    pub lift_id: Option<DbId>,
}

#[derive(Debug, Deserialize)]
pub struct CurrentMaxParams {
    pub lift_id: DbId,
    pub max_type: MaxType,
    pub as_of: Option<Date>,
}

// ---------------------------------------------------------------------------
// POST /maxes
// ---------------------------------------------------------------------------

/// Record a new max for the authenticated user.
pub async fn create_max(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateLiftMax>,
) -> AppResult<impl IntoResponse> {
    validate_max_value(input.value)?;
    LiftRepo::find_by_id(&state.pool, input.lift_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Lift",
            id: input.lift_id,
        })?;

    let created = LiftMaxRepo::create(
        &state.pool,
        auth.user_id,
        input.lift_id,
        input.max_type,
        input.value,
        input.effective_date.unwrap_or_else(today),
    )
    .await?;

    tracing::info!(
        user_id = %auth.user_id,
        lift_id = %created.lift_id,
        max_type = %created.max_type,
        value = %created.value,
        "Lift max recorded",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /maxes
// ---------------------------------------------------------------------------

pub async fn list_maxes(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListMaxesParams>,
) -> AppResult<impl IntoResponse> {
    let items = LiftMaxRepo::list_for_user(&state.pool, auth.user_id, params.lift_id).await?;
    tracing::debug!(count = items.len(), "Listed lift maxes");
    Ok(Json(DataResponse { data: items }))
}

// ---------------------------------------------------------------------------
// GET /maxes/current
// ---------------------------------------------------------------------------

/// The current max of a type, or `null` when none is in effect.
pub async fn current_max(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<CurrentMaxParams>,
) -> AppResult<impl IntoResponse> {
    let current = LiftMaxRepo::find_current(
        &state.pool,
        auth.user_id,
        params.lift_id,
        params.max_type,
        params.as_of.unwrap_or_else(today),
    )
    .await?;
    Ok(Json(DataResponse { data: current }))
}

// ---------------------------------------------------------------------------
// PUT /maxes/{id}
// ---------------------------------------------------------------------------

/// Correct a max's value or effective date. Owner or admin.
pub async fn update_max(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateLiftMax>,
) -> AppResult<impl IntoResponse> {
    if input.value.is_none() && input.effective_date.is_none() {
        return Err(AppError::BadRequest(
            "provide at least one of value or effective_date".into(),
        ));
    }
    if let Some(value) = input.value {
        validate_max_value(value)?;
    }

    let existing = LiftMaxRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "LiftMax",
            id,
        })?;
    auth.require_owner_or_admin(existing.user_id)?;

    let updated = LiftMaxRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "LiftMax",
            id,
        })?;

    tracing::info!(user_id = %auth.user_id, max_id = %id, "Lift max updated");
    Ok(Json(DataResponse { data: updated }))
}
