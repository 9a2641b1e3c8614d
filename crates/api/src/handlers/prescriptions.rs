//! Handlers for prescriptions and standalone load/set resolution.
//!
//! Prescription authoring is admin-only. Resolution endpoints compute weights
//! for the authenticated user and never mutate state.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;

use liftcycle_core::error::CoreError;
use liftcycle_core::load_strategy::{validate_strategy, LoadStrategy};
use liftcycle_core::prescription::validate_prescription;
use liftcycle_core::rounding::Rounding;
use liftcycle_core::set_scheme::{
    generate_sets, validate_reps, validate_scheme, GenerationContext, SetScheme,
};
use liftcycle_core::types::{Date, DbId};
use liftcycle_db::models::prescription::CreatePrescription;
use liftcycle_db::repositories::{EnrollmentRepo, LiftRepo, PrescriptionRepo, ProgramRepo};

use crate::engine::max_cache::MaxCache;
use crate::engine::workout::{resolve_batch, resolve_one, resolve_strategy, LookupScope};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{today, DateParams};
use crate::response::DataResponse;
use crate::state::AppState;

/// Upper bound on ids in one batch resolution.
const MAX_BATCH_SIZE: usize = 100;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ResolveBatchRequest {
    pub prescription_ids: Vec<DbId>,
    pub date: Option<Date>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveStrategyRequest {
    pub strategy: LoadStrategy,
    pub lift_id: DbId,
    pub date: Option<Date>,
    pub week_number: Option<i32>,
    pub day_slug: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateSetsRequest {
    pub scheme: SetScheme,
    pub base_weight: Decimal,
    /// Defaults to `base_weight`.
    pub max_basis: Option<Decimal>,
    #[serde(default)]
    pub rounding: Rounding,
    pub reps_override: Option<i32>,
}

// ---------------------------------------------------------------------------
// POST /prescriptions
// ---------------------------------------------------------------------------

/// Create a prescription (admin only).
///
/// Strategies without a rounding increment get the configured default.
pub async fn create_prescription(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Json(mut input): Json<CreatePrescription>,
) -> AppResult<impl IntoResponse> {
    validate_prescription(&input.load_strategy, &input.set_scheme, input.rest_seconds)?;

    ProgramRepo::find_day(&state.pool, input.day_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Day",
            id: input.day_id,
        })?;
    LiftRepo::find_by_id(&state.pool, input.lift_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Lift",
            id: input.lift_id,
        })?;

    input.load_strategy = input
        .load_strategy
        .with_default_increment(state.config.engine.default_rounding_increment);

    let created = PrescriptionRepo::create(&state.pool, &input).await?;
    tracing::info!(
        admin_id = %admin.user_id,
        prescription_id = %created.id,
        day_id = %created.day_id,
        lift_id = %created.lift_id,
        "Prescription created",
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

// ---------------------------------------------------------------------------
// GET /prescriptions/{id}/resolve
// ---------------------------------------------------------------------------

pub async fn resolve_prescription(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Query(params): Query<DateParams>,
) -> AppResult<impl IntoResponse> {
    let resolved = resolve_one(
        &state.pool,
        auth.user_id,
        id,
        params.date.unwrap_or_else(today),
    )
    .await?;
    Ok(Json(DataResponse { data: resolved }))
}

// ---------------------------------------------------------------------------
// POST /prescriptions/resolve
// ---------------------------------------------------------------------------

/// Resolve many prescriptions at once, sharing one max lookup per lift.
pub async fn resolve_prescriptions(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ResolveBatchRequest>,
) -> AppResult<impl IntoResponse> {
    if input.prescription_ids.is_empty() {
        return Err(AppError::BadRequest(
            "prescription_ids must not be empty".into(),
        ));
    }
    if input.prescription_ids.len() > MAX_BATCH_SIZE {
        return Err(AppError::BadRequest(format!(
            "at most {MAX_BATCH_SIZE} prescriptions can be resolved at once"
        )));
    }

    let resolved = resolve_batch(
        &state.pool,
        auth.user_id,
        &input.prescription_ids,
        input.date.unwrap_or_else(today),
    )
    .await?;
    Ok(Json(DataResponse { data: resolved }))
}

// ---------------------------------------------------------------------------
// POST /load-strategies/resolve
// ---------------------------------------------------------------------------

/// Resolve an ad-hoc strategy against the user's max for a lift.
///
/// Lookup-based strategies fall back to the enrolled program's tables and
/// current week when the request does not name them.
pub async fn resolve_load_strategy(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ResolveStrategyRequest>,
) -> AppResult<impl IntoResponse> {
    validate_strategy(&input.strategy)?;
    LiftRepo::find_by_id(&state.pool, input.lift_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Lift",
            id: input.lift_id,
        })?;

    let enrollment = EnrollmentRepo::find_by_user(&state.pool, auth.user_id).await?;
    let program = match &enrollment {
        Some(e) => ProgramRepo::find_by_id(&state.pool, e.program_id).await?,
        None => None,
    };
    let scope = LookupScope {
        program: program.as_ref(),
        week_number: input
            .week_number
            .or_else(|| enrollment.as_ref().map(|e| e.current_week)),
        day_slug: input.day_slug.as_deref(),
    };

    let mut cache = MaxCache::new(input.date.unwrap_or_else(today));
    let resolution = resolve_strategy(
        &state.pool,
        &mut cache,
        auth.user_id,
        input.lift_id,
        &input.strategy,
        &scope,
    )
    .await?;
    Ok(Json(DataResponse { data: resolution }))
}

// ---------------------------------------------------------------------------
// POST /set-schemes/generate
// ---------------------------------------------------------------------------

/// Expand a scheme into sets for a given base weight. Pure computation.
pub async fn generate_set_scheme(
    _auth: AuthUser,
    Json(input): Json<GenerateSetsRequest>,
) -> AppResult<impl IntoResponse> {
    validate_scheme(&input.scheme)?;
    if input.base_weight < Decimal::ZERO {
        return Err(AppError::BadRequest("base_weight must not be negative".into()));
    }
    if let Some(reps) = input.reps_override {
        validate_reps("reps_override", reps)?;
    }

    let ctx = GenerationContext {
        base_weight: input.base_weight,
        max_basis: input.max_basis.unwrap_or(input.base_weight),
        rounding: input.rounding,
        reps_override: input.reps_override,
    };
    let sets = generate_sets(&input.scheme, &ctx)?;
    Ok(Json(DataResponse { data: sets }))
}
