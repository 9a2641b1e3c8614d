//! Progression application.
//!
//! Manual triggers and event-driven triggers (session finished, week
//! advanced, cycle completed) share [`apply_links`]. New maxes always take
//! effect on the server's current date. Lifts are processed
//! sequentially in priority order inside the caller's transaction; each lift
//! runs in its own savepoint so a failure rolls back only that lift and is
//! reported as data.

use liftcycle_core::error::CoreError;
use liftcycle_core::lift_max::MaxType;
use liftcycle_core::progression::{
    compute_new_value, effective_trigger, period_key, LiftResult, ProgressionParameters,
    TriggerPosition, TriggerResult, TriggerType, SKIP_ALREADY_APPLIED, SKIP_DISABLED,
    SKIP_NO_CURRENT_MAX,
};
use liftcycle_core::types::{Date, DbId};
use liftcycle_db::models::progression::{NewProgressionHistory, ProgramProgression, Progression};
use liftcycle_db::repositories::{
    EnrollmentRepo, LiftMaxRepo, LiftRepo, ProgressionHistoryRepo, ProgressionRepo,
};
use serde_json::json;
use sqlx::{Connection, PgConnection, PgPool};

use crate::error::AppResult;
use crate::query::today;

/// Everything that identifies one firing of a trigger.
#[derive(Debug, Clone)]
pub struct TriggerEvent {
    pub user_id: DbId,
    /// Enrollment the firing belongs to; idempotency is scoped to it.
    pub enrollment_id: DbId,
    pub trigger: TriggerType,
    pub period_key: String,
    pub context: serde_json::Value,
    pub forced: bool,
    /// As-of date for the current max and effective date of the new one.
    pub date: Date,
}

/// A progression resolved to the rule it applies.
struct Rule<'a> {
    progression: &'a Progression,
    params: ProgressionParameters,
}

// ---------------------------------------------------------------------------
// Manual trigger
// ---------------------------------------------------------------------------

/// Apply a progression on demand for the caller's enrolled program.
///
/// With `lift_id`, only that lift's link is targeted (a disabled link is
/// reported as skipped). Without it, every enabled link runs in priority order.
pub async fn apply_manually(
    pool: &PgPool,
    user_id: DbId,
    progression_id: DbId,
    lift_id: Option<DbId>,
    force: bool,
) -> AppResult<TriggerResult> {
    let enrollment = EnrollmentRepo::find_by_user(pool, user_id)
        .await?
        .ok_or(CoreError::UserNotEnrolled)?;
    let progression = ProgressionRepo::find_by_id(pool, progression_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Progression",
            id: progression_id,
        })?;
    if let Some(lift_id) = lift_id {
        LiftRepo::find_by_id(pool, lift_id)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "Lift",
                id: lift_id,
            })?;
    }

    let params = progression.parameters()?;
    let trigger = effective_trigger(progression.kind()?, &params)?;

    let links: Vec<ProgramProgression> =
        ProgressionRepo::list_links(pool, enrollment.program_id, progression_id, lift_id)
            .await?
            .into_iter()
            .filter(|l| lift_id.is_some() || l.enabled)
            .collect();
    if links.is_empty() {
        return Err(CoreError::NoApplicableProgressions.into());
    }

    let position = TriggerPosition {
        cycle_iteration: enrollment.current_cycle_iteration,
        week_number: enrollment.current_week,
        day_index: enrollment.current_day_index,
    };
    let event = TriggerEvent {
        user_id,
        enrollment_id: enrollment.id,
        trigger,
        period_key: period_key(trigger, &position),
        context: json!({
            "source": "manual",
            "cycle_iteration": position.cycle_iteration,
            "week_number": position.week_number,
            "day_index": position.day_index,
        }),
        forced: force,
        date: today(),
    };

    let mut tx = pool.begin().await?;
    let rule = Rule {
        progression: &progression,
        params,
    };
    let results = apply_links(&mut tx, &rule, &links, &event).await?;
    tx.commit().await?;

    let result = TriggerResult::from_results(progression_id, trigger, results);
    tracing::info!(
        %user_id,
        %progression_id,
        force,
        applied = result.total_applied,
        skipped = result.total_skipped,
        errors = result.total_errors,
        "Progression triggered manually",
    );
    Ok(result)
}

// ---------------------------------------------------------------------------
// Event-driven triggers
// ---------------------------------------------------------------------------

/// Fire every progression of `program_id` listening for `event.trigger`.
///
/// Runs on the caller's transaction so the triggering state change and the
/// progressions commit together. `lift_filter` narrows targets to the given
/// lifts (the lifts trained in a finished session).
pub async fn fire_event(
    conn: &mut PgConnection,
    program_id: DbId,
    event: &TriggerEvent,
    lift_filter: Option<&[DbId]>,
) -> AppResult<Vec<TriggerResult>> {
    let progressions =
        ProgressionRepo::list_for_program_trigger(&mut *conn, program_id, event.trigger).await?;

    let mut outcomes = Vec::new();
    for progression in &progressions {
        let links: Vec<ProgramProgression> =
            ProgressionRepo::list_links(&mut *conn, program_id, progression.id, None)
                .await?
                .into_iter()
                .filter(|l| l.enabled)
                .filter(|l| lift_filter.map_or(true, |lifts| lifts.contains(&l.lift_id)))
                .collect();
        if links.is_empty() {
            continue;
        }

        let rule = Rule {
            progression,
            params: progression.parameters()?,
        };
        let results = apply_links(conn, &rule, &links, event).await?;
        outcomes.push(TriggerResult::from_results(
            progression.id,
            event.trigger,
            results,
        ));
    }

    if !outcomes.is_empty() {
        tracing::info!(
            user_id = %event.user_id,
            %program_id,
            trigger = %event.trigger,
            progressions = outcomes.len(),
            "Event-driven progressions fired",
        );
    }
    Ok(outcomes)
}

// ---------------------------------------------------------------------------
// Per-lift application
// ---------------------------------------------------------------------------

/// Apply a rule to each link in order. Only savepoint bookkeeping errors
/// escape; per-lift failures become [`LiftResult::errored`].
async fn apply_links(
    conn: &mut PgConnection,
    rule: &Rule<'_>,
    links: &[ProgramProgression],
    event: &TriggerEvent,
) -> AppResult<Vec<LiftResult>> {
    let key = event.period_key.as_str();
    let mut results = Vec::with_capacity(links.len());

    for link in links {
        if !link.enabled {
            results.push(LiftResult::skipped(link.lift_id, SKIP_DISABLED));
            continue;
        }

        let mut savepoint = conn.begin().await?;
        match apply_lift(&mut savepoint, rule, link.lift_id, event, key).await {
            Ok(result) => {
                savepoint.commit().await?;
                results.push(result);
            }
            Err(err) => {
                savepoint.rollback().await?;
                tracing::warn!(
                    user_id = %event.user_id,
                    progression_id = %rule.progression.id,
                    lift_id = %link.lift_id,
                    error = %err,
                    "Progression failed for lift",
                );
                results.push(LiftResult::errored(link.lift_id, err.to_string()));
            }
        }
    }

    Ok(results)
}

async fn apply_lift(
    conn: &mut PgConnection,
    rule: &Rule<'_>,
    lift_id: DbId,
    event: &TriggerEvent,
    key: &str,
) -> Result<LiftResult, sqlx::Error> {
    let max_type: MaxType = rule.params.max_type;
    LiftMaxRepo::lock_series(&mut *conn, event.user_id, lift_id, max_type).await?;

    let Some(current) =
        LiftMaxRepo::find_current(&mut *conn, event.user_id, lift_id, max_type, event.date).await?
    else {
        return Ok(LiftResult::skipped(lift_id, SKIP_NO_CURRENT_MAX));
    };

    if !event.forced
        && ProgressionHistoryRepo::exists_for_period(
            &mut *conn,
            event.enrollment_id,
            rule.progression.id,
            lift_id,
            key,
        )
        .await?
    {
        return Ok(LiftResult::skipped(lift_id, SKIP_ALREADY_APPLIED));
    }

    let (new_value, delta) = compute_new_value(current.value, &rule.params);
    let new_max =
        LiftMaxRepo::create(&mut *conn, event.user_id, lift_id, max_type, new_value, event.date)
            .await?;

    ProgressionHistoryRepo::create(
        &mut *conn,
        &NewProgressionHistory {
            user_id: event.user_id,
            user_program_state_id: event.enrollment_id,
            progression_id: rule.progression.id,
            lift_id,
            lift_max_id: new_max.id,
            previous_value: current.value,
            new_value,
            delta,
            trigger_type: event.trigger,
            trigger_context: &event.context,
            period_key: key,
            forced: event.forced,
        },
    )
    .await?;

    tracing::info!(
        user_id = %event.user_id,
        progression_id = %rule.progression.id,
        %lift_id,
        previous = %current.value,
        new = %new_value,
        "Progression applied",
    );
    Ok(LiftResult::applied(lift_id, current.value, new_value, delta))
}
