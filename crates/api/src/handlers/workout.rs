//! Handlers for generating the day's workout.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use liftcycle_core::types::Date;

use crate::engine::workout::{generate_workout, WorkoutTarget};
use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::{today, DateParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Query parameters for previewing an arbitrary week/day.
#[derive(Debug, Deserialize)]
pub struct PreviewParams {
    pub week: i32,
    /// Day slug; the week's first day when omitted.
    pub day: Option<String>,
    pub date: Option<Date>,
}

// ---------------------------------------------------------------------------
// GET /workout
// ---------------------------------------------------------------------------

/// The workout at the user's current position.
pub async fn current_workout(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<DateParams>,
) -> AppResult<impl IntoResponse> {
    let workout = generate_workout(
        &state.pool,
        auth.user_id,
        WorkoutTarget::Current,
        params.date.unwrap_or_else(today),
    )
    .await?;
    tracing::debug!(
        user_id = %auth.user_id,
        week = workout.week_number,
        day = %workout.day_slug,
        exercises = workout.exercises.len(),
        "Generated workout",
    );
    Ok(Json(DataResponse { data: workout }))
}

// ---------------------------------------------------------------------------
// GET /workout/preview
// ---------------------------------------------------------------------------

/// Preview any week/day of the enrolled program without touching state.
pub async fn preview_workout(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<PreviewParams>,
) -> AppResult<impl IntoResponse> {
    let workout = generate_workout(
        &state.pool,
        auth.user_id,
        WorkoutTarget::Preview {
            week_number: params.week,
            day_slug: params.day.as_deref(),
        },
        params.date.unwrap_or_else(today),
    )
    .await?;
    Ok(Json(DataResponse { data: workout }))
}
