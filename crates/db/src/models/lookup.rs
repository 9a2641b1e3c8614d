//! Weekly and daily lookup tables.

use liftcycle_core::load_strategy::LookupEntry;
use liftcycle_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Weekly
// ---------------------------------------------------------------------------

/// A row from the `weekly_lookups` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WeeklyLookup {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `weekly_lookup_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WeeklyLookupEntry {
    pub id: DbId,
    pub weekly_lookup_id: DbId,
    pub week_number: i32,
    pub percentage: Option<Decimal>,
    pub reps: Option<i32>,
    pub percentage_modifier: Option<Decimal>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl WeeklyLookupEntry {
    pub fn entry(&self) -> LookupEntry {
        LookupEntry {
            percentage: self.percentage,
            reps: self.reps,
            percentage_modifier: self.percentage_modifier,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateWeeklyLookupEntry {
    pub week_number: i32,
    pub percentage: Option<Decimal>,
    pub reps: Option<i32>,
    pub percentage_modifier: Option<Decimal>,
}

// ---------------------------------------------------------------------------
// Daily
// ---------------------------------------------------------------------------

/// A row from the `daily_lookups` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DailyLookup {
    pub id: DbId,
    pub name: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `daily_lookup_entries` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DailyLookupEntry {
    pub id: DbId,
    pub daily_lookup_id: DbId,
    pub day_slug: String,
    pub percentage: Option<Decimal>,
    pub reps: Option<i32>,
    pub percentage_modifier: Option<Decimal>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl DailyLookupEntry {
    pub fn entry(&self) -> LookupEntry {
        LookupEntry {
            percentage: self.percentage,
            reps: self.reps,
            percentage_modifier: self.percentage_modifier,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateDailyLookupEntry {
    pub day_slug: String,
    pub percentage: Option<Decimal>,
    pub reps: Option<i32>,
    pub percentage_modifier: Option<Decimal>,
}
