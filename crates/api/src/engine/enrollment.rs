//! Enrollment lifecycle and advancement.
//!
//! Advancement locks the state row, applies the pure transition from
//! `liftcycle_core::enrollment`, writes the new position, and fires the
//! event-driven progressions for whatever the transition completed, all in
//! one transaction.

use liftcycle_core::enrollment::{
    advance_day, advance_week, derive_statuses, next_cycle, EnrollmentStatus, PhaseStatus,
    Transition,
};
use liftcycle_core::error::CoreError;
use liftcycle_core::progression::{period_key, TriggerPosition, TriggerResult, TriggerType};
use liftcycle_core::types::DbId;
use liftcycle_db::models::enrollment::UserProgramState;
use liftcycle_db::repositories::{EnrollmentRepo, ProgramRepo};
use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;

use crate::engine::progression::{fire_event, TriggerEvent};
use crate::engine::workout::week_days;
use crate::error::AppResult;
use crate::query::today;

/// Enrollment state with its derived statuses.
#[derive(Debug, Serialize)]
pub struct EnrollmentView {
    #[serde(flatten)]
    pub state: UserProgramState,
    pub cycle_status: PhaseStatus,
    pub week_status: PhaseStatus,
    pub cycle_length_weeks: i32,
}

impl EnrollmentView {
    fn new(state: UserProgramState, cycle_length_weeks: i32) -> AppResult<Self> {
        let (cycle_status, week_status) = derive_statuses(&state.position()?);
        Ok(Self {
            state,
            cycle_status,
            week_status,
            cycle_length_weeks,
        })
    }
}

/// Result of an advancement, including any progressions it fired.
#[derive(Debug, Serialize)]
pub struct AdvanceOutcome {
    pub enrollment: EnrollmentView,
    pub progressions: Vec<TriggerResult>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Week,
    Day,
    NextCycle,
}

impl Advance {
    fn label(self) -> &'static str {
        match self {
            Self::Week => "advance_week",
            Self::Day => "advance_day",
            Self::NextCycle => "next_cycle",
        }
    }
}

async fn cycle_length(pool: &PgPool, program_id: DbId) -> AppResult<i32> {
    let program = ProgramRepo::find_by_id(pool, program_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Program",
            id: program_id,
        })?;
    let cycle = ProgramRepo::find_cycle(pool, program.cycle_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Cycle",
            id: program.cycle_id,
        })?;
    Ok(cycle.length_weeks)
}

/// Enroll a user, replacing any existing enrollment.
pub async fn enroll(pool: &PgPool, user_id: DbId, program_id: DbId) -> AppResult<EnrollmentView> {
    let length = cycle_length(pool, program_id).await?;
    let state = EnrollmentRepo::enroll(pool, user_id, program_id).await?;
    tracing::info!(%user_id, %program_id, "User enrolled in program");
    EnrollmentView::new(state, length)
}

pub async fn current(pool: &PgPool, user_id: DbId) -> AppResult<EnrollmentView> {
    let state = EnrollmentRepo::find_by_user(pool, user_id)
        .await?
        .ok_or(CoreError::UserNotEnrolled)?;
    let length = cycle_length(pool, state.program_id).await?;
    EnrollmentView::new(state, length)
}

pub async fn unenroll(pool: &PgPool, user_id: DbId) -> AppResult<()> {
    if !EnrollmentRepo::delete_by_user(pool, user_id).await? {
        return Err(CoreError::UserNotEnrolled.into());
    }
    tracing::info!(%user_id, "User unenrolled");
    Ok(())
}

/// Apply one advancement atomically.
pub async fn advance(
    pool: &PgPool,
    user_id: DbId,
    op: Advance,
) -> AppResult<AdvanceOutcome> {
    let mut tx = pool.begin().await?;

    let state = EnrollmentRepo::find_by_user_for_update(&mut tx, user_id)
        .await?
        .ok_or(CoreError::UserNotEnrolled)?;
    let program = ProgramRepo::find_by_id(pool, state.program_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Program",
            id: state.program_id,
        })?;
    let cycle = ProgramRepo::find_cycle(pool, program.cycle_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Cycle",
            id: program.cycle_id,
        })?;
    let pos = state.position()?;

    let transition: Transition = match op {
        Advance::Week => advance_week(&pos, cycle.length_weeks)?,
        Advance::Day if pos.status == EnrollmentStatus::Active => {
            let days = week_days(pool, &cycle, pos.current_week).await?;
            advance_day(&pos, days.len() as i32, cycle.length_weeks)?
        }
        // Between cycles the schedule is irrelevant; the transition rejects it.
        Advance::Day => advance_day(&pos, 0, cycle.length_weeks)?,
        Advance::NextCycle => next_cycle(&pos)?,
    };

    let updated = EnrollmentRepo::update_position(&mut tx, state.id, &transition.next).await?;

    let mut progressions = Vec::new();
    if let Some(week_number) = transition.completed_week {
        let position = TriggerPosition {
            cycle_iteration: pos.current_cycle_iteration,
            week_number,
            day_index: None,
        };
        let event = TriggerEvent {
            user_id,
            enrollment_id: state.id,
            trigger: TriggerType::AfterWeek,
            period_key: period_key(TriggerType::AfterWeek, &position),
            context: json!({
                "source": "week_advanced",
                "cycle_iteration": position.cycle_iteration,
                "week_number": week_number,
            }),
            forced: false,
            date: today(),
        };
        progressions.extend(fire_event(&mut tx, program.id, &event, None).await?);
    }
    if transition.cycle_completed {
        let position = TriggerPosition {
            cycle_iteration: pos.current_cycle_iteration,
            week_number: pos.current_week,
            day_index: None,
        };
        let event = TriggerEvent {
            user_id,
            enrollment_id: state.id,
            trigger: TriggerType::AfterCycle,
            period_key: period_key(TriggerType::AfterCycle, &position),
            context: json!({
                "source": "cycle_completed",
                "cycle_iteration": position.cycle_iteration,
            }),
            forced: false,
            date: today(),
        };
        progressions.extend(fire_event(&mut tx, program.id, &event, None).await?);
    }

    tx.commit().await?;

    tracing::info!(
        %user_id,
        op = op.label(),
        week = updated.current_week,
        cycle = updated.current_cycle_iteration,
        status = %updated.enrollment_status,
        progressions = progressions.len(),
        "Enrollment advanced",
    );

    Ok(AdvanceOutcome {
        enrollment: EnrollmentView::new(updated, cycle.length_weeks)?,
        progressions,
    })
}
