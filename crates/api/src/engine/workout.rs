//! Prescription and workout resolution.
//!
//! Every path goes through [`resolve_with_cache`]: load the strategy's max
//! through the request's [`MaxCache`], gather lookup entries for the
//! (week, day) position, then hand off to the pure resolvers in
//! `liftcycle_core`.

use std::collections::HashMap;

use liftcycle_core::error::CoreError;
use liftcycle_core::load_strategy::{resolve_load, LoadResolution, LoadStrategy, LookupValues};
use liftcycle_core::prescription::{resolve_prescription, LiftInfo, ResolvedPrescription};
use liftcycle_core::types::{Date, DbId};
use liftcycle_core::workout::{select_day, DaySlot, Workout};
use liftcycle_db::models::enrollment::UserProgramState;
use liftcycle_db::models::prescription::Prescription;
use liftcycle_db::models::program::{Cycle, Program};
use liftcycle_db::repositories::{
    EnrollmentRepo, LiftRepo, LookupRepo, PrescriptionRepo, ProgramRepo,
};
use sqlx::PgPool;

use crate::engine::max_cache::MaxCache;
use crate::error::AppResult;

// ---------------------------------------------------------------------------
// Lookup scope
// ---------------------------------------------------------------------------

/// Where in a program a prescription is being resolved.
///
/// The program supplies fallback lookup tables for strategies that do not
/// name their own; week and day select the entries.
#[derive(Debug, Clone, Copy, Default)]
pub struct LookupScope<'a> {
    pub program: Option<&'a Program>,
    pub week_number: Option<i32>,
    pub day_slug: Option<&'a str>,
}

/// Fetch the weekly/daily lookup entries a strategy needs. Non-lookup
/// strategies get empty values without touching the database.
pub async fn load_lookup_values(
    pool: &PgPool,
    strategy: &LoadStrategy,
    scope: &LookupScope<'_>,
) -> AppResult<LookupValues> {
    let Some(refs) = strategy.lookup_refs() else {
        return Ok(LookupValues::default());
    };

    let weekly_id = refs
        .weekly_lookup_id
        .or_else(|| scope.program.and_then(|p| p.weekly_lookup_id));
    let daily_id = refs
        .daily_lookup_id
        .or_else(|| scope.program.and_then(|p| p.daily_lookup_id));

    let weekly = match (weekly_id, scope.week_number) {
        (Some(id), Some(week)) => LookupRepo::find_weekly_entry(pool, id, week)
            .await?
            .map(|e| e.entry()),
        _ => None,
    };
    let daily = match (daily_id, scope.day_slug) {
        (Some(id), Some(slug)) => LookupRepo::find_daily_entry(pool, id, slug)
            .await?
            .map(|e| e.entry()),
        _ => None,
    };

    Ok(LookupValues { weekly, daily })
}

// ---------------------------------------------------------------------------
// Single resolution
// ---------------------------------------------------------------------------

/// Resolve a load strategy for one lift.
pub async fn resolve_strategy(
    pool: &PgPool,
    cache: &mut MaxCache,
    user_id: DbId,
    lift_id: DbId,
    strategy: &LoadStrategy,
    scope: &LookupScope<'_>,
) -> AppResult<LoadResolution> {
    let max_value = cache
        .require(pool, user_id, lift_id, strategy.reference_type())
        .await?;
    let lookups = load_lookup_values(pool, strategy, scope).await?;
    Ok(resolve_load(strategy, max_value, &lookups)?)
}

/// Resolve one stored prescription using a shared cache.
pub async fn resolve_with_cache(
    pool: &PgPool,
    cache: &mut MaxCache,
    user_id: DbId,
    prescription: &Prescription,
    lift: LiftInfo,
    scope: &LookupScope<'_>,
) -> AppResult<ResolvedPrescription> {
    let domain = prescription.to_domain();
    let max_value = cache
        .require(
            pool,
            user_id,
            domain.lift_id,
            domain.load_strategy.reference_type(),
        )
        .await?;
    let lookups = load_lookup_values(pool, &domain.load_strategy, scope).await?;
    Ok(resolve_prescription(&domain, lift, max_value, &lookups)?)
}

/// Program and lookup position a prescription resolves against outside a
/// workout: its own program, plus the user's current week when they are
/// enrolled in that program.
struct PrescriptionSite {
    program: Program,
    day_slug: String,
    week_number: Option<i32>,
}

async fn prescription_site(
    pool: &PgPool,
    prescription: &Prescription,
    enrollment: Option<&UserProgramState>,
) -> AppResult<PrescriptionSite> {
    let day = ProgramRepo::find_day(pool, prescription.day_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Day",
            id: prescription.day_id,
        })?;
    let program = ProgramRepo::find_by_id(pool, day.program_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Program",
            id: day.program_id,
        })?;
    let week_number = enrollment
        .filter(|s| s.program_id == program.id)
        .map(|s| s.current_week);

    Ok(PrescriptionSite {
        program,
        day_slug: day.slug,
        week_number,
    })
}

/// Resolve a single prescription by id for a user.
pub async fn resolve_one(
    pool: &PgPool,
    user_id: DbId,
    prescription_id: DbId,
    as_of: Date,
) -> AppResult<ResolvedPrescription> {
    let mut results = resolve_batch(pool, user_id, &[prescription_id], as_of).await?;
    results.pop().ok_or_else(|| {
        CoreError::NotFound {
            entity: "Prescription",
            id: prescription_id,
        }
        .into()
    })
}

/// Resolve many prescriptions, sharing one [`MaxCache`] across the batch.
///
/// Results follow the order of `prescription_ids`. Any unknown id fails the
/// whole batch.
pub async fn resolve_batch(
    pool: &PgPool,
    user_id: DbId,
    prescription_ids: &[DbId],
    as_of: Date,
) -> AppResult<Vec<ResolvedPrescription>> {
    let rows = PrescriptionRepo::find_by_ids(pool, prescription_ids).await?;
    let by_id: HashMap<DbId, &Prescription> = rows.iter().map(|p| (p.id, p)).collect();

    let lift_ids: Vec<DbId> = rows.iter().map(|p| p.lift_id).collect();
    let lifts: HashMap<DbId, LiftInfo> = LiftRepo::find_by_ids(pool, &lift_ids)
        .await?
        .into_iter()
        .map(|l| (l.id, l.info()))
        .collect();

    let enrollment = EnrollmentRepo::find_by_user(pool, user_id).await?;
    let mut sites: HashMap<DbId, PrescriptionSite> = HashMap::new();
    let mut cache = MaxCache::new(as_of);
    let mut resolved = Vec::with_capacity(prescription_ids.len());

    for id in prescription_ids {
        let prescription = by_id.get(id).copied().ok_or(CoreError::NotFound {
            entity: "Prescription",
            id: *id,
        })?;
        let lift = lifts
            .get(&prescription.lift_id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: "Lift",
                id: prescription.lift_id,
            })?;

        if !sites.contains_key(&prescription.day_id) {
            let site = prescription_site(pool, prescription, enrollment.as_ref()).await?;
            sites.insert(prescription.day_id, site);
        }
        let site = &sites[&prescription.day_id];
        let scope = LookupScope {
            program: Some(&site.program),
            week_number: site.week_number,
            day_slug: Some(&site.day_slug),
        };

        resolved.push(
            resolve_with_cache(pool, &mut cache, user_id, prescription, lift, &scope).await?,
        );
    }

    tracing::debug!(
        %user_id,
        count = resolved.len(),
        max_queries = cache.queries(),
        "Resolved prescription batch",
    );
    Ok(resolved)
}

// ---------------------------------------------------------------------------
// Workouts
// ---------------------------------------------------------------------------

/// Which day to generate.
#[derive(Debug, Clone, Copy)]
pub enum WorkoutTarget<'a> {
    /// The user's current week and day.
    Current,
    /// An explicit week and optional day slug; state is neither read for
    /// position nor mutated.
    Preview {
        week_number: i32,
        day_slug: Option<&'a str>,
    },
}

/// An enrolled user's program context.
pub struct ProgramContext {
    pub enrollment: UserProgramState,
    pub program: Program,
    pub cycle: Cycle,
}

/// Load the user's enrollment, program, and cycle.
pub async fn load_program_context(pool: &PgPool, user_id: DbId) -> AppResult<ProgramContext> {
    let enrollment = EnrollmentRepo::find_by_user(pool, user_id)
        .await?
        .ok_or(CoreError::UserNotEnrolled)?;
    let program = ProgramRepo::find_by_id(pool, enrollment.program_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Program",
            id: enrollment.program_id,
        })?;
    let cycle = ProgramRepo::find_cycle(pool, program.cycle_id)
        .await?
        .ok_or(CoreError::NotFound {
            entity: "Cycle",
            id: program.cycle_id,
        })?;

    Ok(ProgramContext {
        enrollment,
        program,
        cycle,
    })
}

/// Ordered day slots for a week of the program's cycle.
pub async fn week_days(pool: &PgPool, cycle: &Cycle, week_number: i32) -> AppResult<Vec<DaySlot>> {
    if week_number < 1 || week_number > cycle.length_weeks {
        return Err(CoreError::WeekNotFound { week_number }.into());
    }
    let week = ProgramRepo::find_week(pool, cycle.id, week_number)
        .await?
        .ok_or(CoreError::WeekNotFound { week_number })?;

    Ok(ProgramRepo::list_days_for_week(pool, week.id)
        .await?
        .into_iter()
        .map(DaySlot::from)
        .collect())
}

/// Generate the workout for a user's current position or a previewed one.
pub async fn generate_workout(
    pool: &PgPool,
    user_id: DbId,
    target: WorkoutTarget<'_>,
    date: Date,
) -> AppResult<Workout> {
    let ctx = load_program_context(pool, user_id).await?;

    let (week_number, day_index, day_slug) = match target {
        WorkoutTarget::Current => (
            ctx.enrollment.current_week,
            ctx.enrollment.current_day_index,
            None,
        ),
        WorkoutTarget::Preview {
            week_number,
            day_slug,
        } => (week_number, None, day_slug),
    };

    let days = week_days(pool, &ctx.cycle, week_number).await?;
    let day = select_day(&days, day_index, day_slug)?;

    let prescriptions = PrescriptionRepo::list_for_day(pool, day.day_id).await?;
    let lift_ids: Vec<DbId> = prescriptions.iter().map(|p| p.lift_id).collect();
    let lifts: HashMap<DbId, LiftInfo> = LiftRepo::find_by_ids(pool, &lift_ids)
        .await?
        .into_iter()
        .map(|l| (l.id, l.info()))
        .collect();

    let scope = LookupScope {
        program: Some(&ctx.program),
        week_number: Some(week_number),
        day_slug: Some(&day.slug),
    };
    let mut cache = MaxCache::new(date);
    let mut exercises = Vec::with_capacity(prescriptions.len());
    for prescription in &prescriptions {
        let lift = lifts
            .get(&prescription.lift_id)
            .cloned()
            .ok_or(CoreError::NotFound {
                entity: "Lift",
                id: prescription.lift_id,
            })?;
        exercises.push(
            resolve_with_cache(pool, &mut cache, user_id, prescription, lift, &scope).await?,
        );
    }

    Ok(Workout {
        user_id,
        program_id: ctx.program.id,
        cycle_iteration: ctx.enrollment.current_cycle_iteration,
        week_number,
        day_slug: day.slug.clone(),
        day_name: day.name.clone(),
        date,
        exercises,
    })
}
