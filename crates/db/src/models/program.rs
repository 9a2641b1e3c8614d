//! Program structure models: cycles, weeks, programs, days, and the
//! week/day schedule.

use liftcycle_core::types::{DbId, Timestamp};
use liftcycle_core::workout::DaySlot;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Cycles
// ---------------------------------------------------------------------------

/// A row from the `cycles` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Cycle {
    pub id: DbId,
    pub name: String,
    pub length_weeks: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateCycle {
    pub name: String,
    pub length_weeks: i32,
}

/// A row from the `cycle_weeks` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CycleWeek {
    pub id: DbId,
    pub cycle_id: DbId,
    pub week_number: i32,
    pub name: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateCycleWeek {
    pub cycle_id: DbId,
    pub week_number: i32,
    pub name: Option<String>,
}

// ---------------------------------------------------------------------------
// Programs
// ---------------------------------------------------------------------------

/// A row from the `programs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Program {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub cycle_id: DbId,
    pub weekly_lookup_id: Option<DbId>,
    pub daily_lookup_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateProgram {
    pub name: String,
    pub slug: String,
    pub cycle_id: DbId,
    pub weekly_lookup_id: Option<DbId>,
    pub daily_lookup_id: Option<DbId>,
}

// ---------------------------------------------------------------------------
// Days
// ---------------------------------------------------------------------------

/// A row from the `days` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Day {
    pub id: DbId,
    pub program_id: DbId,
    pub name: String,
    pub slug: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Deserialize)]
pub struct CreateDay {
    pub program_id: DbId,
    pub name: String,
    pub slug: String,
}

/// DTO placing a day at a position within a cycle week.
#[derive(Debug, Deserialize)]
pub struct CreateWeekDay {
    pub week_id: DbId,
    pub day_id: DbId,
    pub position: i32,
}

/// A day scheduled within a week, joined from `week_days` and `days`.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ScheduledDay {
    pub day_id: DbId,
    pub name: String,
    pub slug: String,
    pub position: i32,
}

impl From<ScheduledDay> for DaySlot {
    fn from(d: ScheduledDay) -> Self {
        DaySlot {
            day_id: d.day_id,
            slug: d.slug,
            name: d.name,
            position: d.position,
        }
    }
}
