//! Workout sessions.
//!
//! Sessions record what was actually lifted. Logged sets drive the next-set
//! computation of variable schemes, and finishing a session fires the
//! AFTER_SESSION progressions for the lifts it trained.

use liftcycle_core::error::CoreError;
use liftcycle_core::progression::{session_period_key, TriggerResult, TriggerType};
use liftcycle_core::session::{
    require_in_progress, validate_logged_set, validate_transition, STATUS_ABANDONED,
    STATUS_COMPLETED,
};
use liftcycle_core::enrollment::EnrollmentStatus;
use liftcycle_core::set_scheme::{next_set, LoggedSetView, NextSetResult};
use liftcycle_core::types::{Date, DbId};
use liftcycle_db::models::enrollment::UserProgramState;
use liftcycle_db::models::program::Program;
use liftcycle_db::models::session::{CreateLoggedSet, LoggedSet, WorkoutSession};
use liftcycle_db::repositories::{EnrollmentRepo, PrescriptionRepo, ProgramRepo, SessionRepo};
use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;

use crate::engine::max_cache::MaxCache;
use crate::engine::progression::{fire_event, TriggerEvent};
use crate::engine::workout::{resolve_strategy, LookupScope};
use crate::error::AppResult;
use crate::query::today;

/// A session with its logged sets.
#[derive(Debug, Serialize)]
pub struct SessionDetail {
    #[serde(flatten)]
    pub session: WorkoutSession,
    pub sets: Vec<LoggedSet>,
}

/// A finished session and the progressions it fired.
#[derive(Debug, Serialize)]
pub struct FinishOutcome {
    pub session: WorkoutSession,
    pub progressions: Vec<TriggerResult>,
}

async fn enrollment_for(pool: &PgPool, user_id: DbId) -> AppResult<UserProgramState> {
    Ok(EnrollmentRepo::find_by_user(pool, user_id)
        .await?
        .ok_or(CoreError::UserNotEnrolled)?)
}

/// Load a session belonging to the user's current enrollment.
///
/// Sessions of other users (or of a replaced enrollment) are reported as
/// not found.
async fn owned_session(
    pool: &PgPool,
    user_id: DbId,
    session_id: DbId,
) -> AppResult<(WorkoutSession, UserProgramState)> {
    let enrollment = enrollment_for(pool, user_id).await?;
    let session = SessionRepo::find_by_id(pool, session_id)
        .await?
        .filter(|s| s.user_program_state_id == enrollment.id)
        .ok_or(CoreError::NotFound {
            entity: "WorkoutSession",
            id: session_id,
        })?;
    Ok((session, enrollment))
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

/// Open a session at the user's current position.
pub async fn start(pool: &PgPool, user_id: DbId) -> AppResult<WorkoutSession> {
    let enrollment = enrollment_for(pool, user_id).await?;
    if enrollment.position()?.status != EnrollmentStatus::Active {
        return Err(CoreError::InvalidState(
            "cannot start a session between cycles; start the next cycle first".to_string(),
        )
        .into());
    }

    let session = SessionRepo::create(
        pool,
        enrollment.id,
        enrollment.current_cycle_iteration,
        enrollment.current_week,
        enrollment.current_day_index,
    )
    .await?;

    tracing::info!(
        %user_id,
        session_id = %session.id,
        week = session.week_number,
        "Workout session started",
    );
    Ok(session)
}

pub async fn detail(pool: &PgPool, user_id: DbId, session_id: DbId) -> AppResult<SessionDetail> {
    let (session, _) = owned_session(pool, user_id, session_id).await?;
    let sets = SessionRepo::list_sets(pool, session.id, None).await?;
    Ok(SessionDetail { session, sets })
}

/// Finish a session and fire AFTER_SESSION progressions for its lifts.
pub async fn finish(
    pool: &PgPool,
    user_id: DbId,
    session_id: DbId,
) -> AppResult<FinishOutcome> {
    let (session, enrollment) = owned_session(pool, user_id, session_id).await?;
    validate_transition(&session.status, STATUS_COMPLETED)?;

    let mut tx = pool.begin().await?;
    let closed = SessionRepo::close(&mut tx, session.id, STATUS_COMPLETED)
        .await?
        .ok_or_else(|| CoreError::InvalidState("session is no longer in progress".to_string()))?;

    let lifts = SessionRepo::logged_lift_ids(&mut tx, closed.id).await?;
    let event = TriggerEvent {
        user_id,
        enrollment_id: enrollment.id,
        trigger: TriggerType::AfterSession,
        period_key: session_period_key(closed.id),
        context: json!({
            "source": "session_finished",
            "session_id": closed.id,
            "cycle_iteration": closed.cycle_iteration,
            "week_number": closed.week_number,
            "day_index": closed.day_index,
        }),
        forced: false,
        date: today(),
    };
    let progressions = if lifts.is_empty() {
        Vec::new()
    } else {
        fire_event(&mut tx, enrollment.program_id, &event, Some(&lifts)).await?
    };

    tx.commit().await?;

    tracing::info!(
        %user_id,
        session_id = %closed.id,
        lifts = lifts.len(),
        progressions = progressions.len(),
        "Workout session finished",
    );
    Ok(FinishOutcome {
        session: closed,
        progressions,
    })
}

pub async fn abandon(pool: &PgPool, user_id: DbId, session_id: DbId) -> AppResult<WorkoutSession> {
    let (session, _) = owned_session(pool, user_id, session_id).await?;
    validate_transition(&session.status, STATUS_ABANDONED)?;

    let mut conn = pool.acquire().await?;
    let closed = SessionRepo::close(&mut conn, session.id, STATUS_ABANDONED)
        .await?
        .ok_or_else(|| CoreError::InvalidState("session is no longer in progress".to_string()))?;

    tracing::info!(%user_id, session_id = %closed.id, "Workout session abandoned");
    Ok(closed)
}

// ---------------------------------------------------------------------------
// Sets
// ---------------------------------------------------------------------------

/// Record a performed set against one of the program's prescriptions.
pub async fn log_set(
    pool: &PgPool,
    user_id: DbId,
    session_id: DbId,
    input: &CreateLoggedSet,
) -> AppResult<LoggedSet> {
    let (session, enrollment) = owned_session(pool, user_id, session_id).await?;
    require_in_progress(&session.status)?;
    validate_logged_set(
        input.set_number,
        input.weight,
        input.target_reps,
        input.reps_performed,
        input.rpe,
    )?;

    let prescription = PrescriptionRepo::find_by_id(pool, input.prescription_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Prescription",
            id: input.prescription_id,
        })?;
    let program_id = PrescriptionRepo::find_program_id(pool, prescription.id).await?;
    if program_id != Some(enrollment.program_id) {
        return Err(CoreError::Validation(
            "prescription does not belong to the enrolled program".to_string(),
        )
        .into());
    }

    let set = SessionRepo::log_set(pool, session.id, prescription.lift_id, input).await?;
    tracing::info!(
        %user_id,
        session_id = %session.id,
        prescription_id = %prescription.id,
        set_number = set.set_number,
        reps = set.reps_performed,
        "Set logged",
    );
    Ok(set)
}

/// Compute the next set of a variable scheme from the session's history.
pub async fn next_set_for(
    pool: &PgPool,
    user_id: DbId,
    session_id: DbId,
    prescription_id: DbId,
    date: Date,
) -> AppResult<NextSetResult> {
    let (session, enrollment) = owned_session(pool, user_id, session_id).await?;
    let prescription = PrescriptionRepo::find_by_id(pool, prescription_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Prescription",
            id: prescription_id,
        })?;

    let scheme = &prescription.set_scheme.0;
    if !scheme.is_variable() {
        return Err(CoreError::UnsupportedScheme(scheme.kind().to_string()).into());
    }

    let history: Vec<LoggedSetView> = SessionRepo::list_sets(pool, session.id, Some(prescription.id))
        .await?
        .iter()
        .map(LoggedSet::view)
        .collect();
    if history.is_empty() {
        return Err(CoreError::NoSetsLogged.into());
    }

    let day = ProgramRepo::find_day(pool, prescription.day_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Day",
            id: prescription.day_id,
        })?;
    let program: Option<Program> = ProgramRepo::find_by_id(pool, enrollment.program_id).await?;
    let scope = LookupScope {
        program: program.as_ref(),
        week_number: Some(session.week_number),
        day_slug: Some(&day.slug),
    };

    let strategy = &prescription.load_strategy.0;
    let mut cache = MaxCache::new(date);
    let load = resolve_strategy(
        pool,
        &mut cache,
        user_id,
        prescription.lift_id,
        strategy,
        &scope,
    )
    .await?;

    Ok(next_set(scheme, load.weight, &history, &strategy.rounding())?)
}
