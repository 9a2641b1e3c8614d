//! Handlers for progression rules, program links, manual triggers, and history.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use liftcycle_core::error::CoreError;
use liftcycle_core::pagination::{clamp_limit, clamp_offset, DEFAULT_HISTORY_LIMIT, MAX_PAGE_LIMIT};
use liftcycle_core::progression::validate_progression;
use liftcycle_core::types::DbId;
use liftcycle_db::models::progression::{
    CreateProgramProgression, CreateProgression, ProgressionHistoryListParams,
};
use liftcycle_db::repositories::{
    LiftRepo, ProgramRepo, ProgressionHistoryRepo, ProgressionRepo,
};

use crate::engine::progression::apply_manually;
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct TriggerRequest {
    pub lift_id: Option<DbId>,
    #[serde(default)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// POST /progressions
// ---------------------------------------------------------------------------

/// Define a progression rule (admin only).
pub async fn create_progression(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateProgression>,
) -> AppResult<impl IntoResponse> {
    if input.name.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "name must not be empty".into(),
        )));
    }
    validate_progression(input.progression_type, &input.parameters)?;

    let created = ProgressionRepo::create(&state.pool, &input).await?;
    tracing::info!(
        admin_id = %admin.user_id,
        progression_id = %created.id,
        kind = %created.progression_type,
        "Progression created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// POST /programs/{id}/progressions
// ---------------------------------------------------------------------------

/// Attach a progression to one lift of a program (admin only).
pub async fn link_progression(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(program_id): Path<DbId>,
    Json(input): Json<CreateProgramProgression>,
) -> AppResult<impl IntoResponse> {
    ProgramRepo::find_by_id(&state.pool, program_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Program",
            id: program_id,
        })?;
    ProgressionRepo::find_by_id(&state.pool, input.progression_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Progression",
            id: input.progression_id,
        })?;
    LiftRepo::find_by_id(&state.pool, input.lift_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Lift",
            id: input.lift_id,
        })?;

    let link = ProgressionRepo::link_to_program(&state.pool, program_id, &input).await?;
    tracing::info!(
        admin_id = %admin.user_id,
        %program_id,
        progression_id = %link.progression_id,
        lift_id = %link.lift_id,
        priority = link.priority,
        "Progression linked to program",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: link })))
}

// ---------------------------------------------------------------------------
// POST /progressions/{id}/trigger
// ---------------------------------------------------------------------------

/// Apply a progression now for the caller's enrolled program.
///
/// An empty body targets every enabled lift link.
pub async fn trigger_progression(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(progression_id): Path<DbId>,
    body: Option<Json<TriggerRequest>>,
) -> AppResult<impl IntoResponse> {
    let input = body.map(|Json(b)| b).unwrap_or_default();
    let result = apply_manually(
        &state.pool,
        auth.user_id,
        progression_id,
        input.lift_id,
        input.force,
    )
    .await?;
    Ok(Json(DataResponse { data: result }))
}

// ---------------------------------------------------------------------------
// GET /progression-history
// ---------------------------------------------------------------------------

pub async fn list_history(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ProgressionHistoryListParams>,
) -> AppResult<impl IntoResponse> {
    let limit = clamp_limit(params.limit, DEFAULT_HISTORY_LIMIT, MAX_PAGE_LIMIT);
    let offset = clamp_offset(params.offset);
    let items =
        ProgressionHistoryRepo::list_for_user(&state.pool, auth.user_id, params.lift_id, limit, offset)
            .await?;
    tracing::debug!(count = items.len(), limit, offset, "Listed progression history");
    Ok(Json(DataResponse { data: items }))
}
