//! Repository for weekly and daily lookup tables.

use liftcycle_core::types::DbId;
use sqlx::PgPool;

use crate::models::lookup::{
    CreateDailyLookupEntry, CreateWeeklyLookupEntry, DailyLookup, DailyLookupEntry, WeeklyLookup,
    WeeklyLookupEntry,
};

const LOOKUP_COLUMNS: &str = "id, name, created_at, updated_at";

const WEEKLY_ENTRY_COLUMNS: &str = "\
    id, weekly_lookup_id, week_number, percentage, reps, percentage_modifier, \
    created_at, updated_at";

const DAILY_ENTRY_COLUMNS: &str = "\
    id, daily_lookup_id, day_slug, percentage, reps, percentage_modifier, \
    created_at, updated_at";

pub struct LookupRepo;

impl LookupRepo {
    // -----------------------------------------------------------------------
    // Weekly
    // -----------------------------------------------------------------------

    pub async fn create_weekly(pool: &PgPool, name: &str) -> Result<WeeklyLookup, sqlx::Error> {
        let query = format!("INSERT INTO weekly_lookups (name) VALUES ($1) RETURNING {LOOKUP_COLUMNS}");
        sqlx::query_as::<_, WeeklyLookup>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    pub async fn add_weekly_entry(
        pool: &PgPool,
        weekly_lookup_id: DbId,
        input: &CreateWeeklyLookupEntry,
    ) -> Result<WeeklyLookupEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO weekly_lookup_entries \
                (weekly_lookup_id, week_number, percentage, reps, percentage_modifier) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {WEEKLY_ENTRY_COLUMNS}"
        );
        sqlx::query_as::<_, WeeklyLookupEntry>(&query)
            .bind(weekly_lookup_id)
            .bind(input.week_number)
            .bind(input.percentage)
            .bind(input.reps)
            .bind(input.percentage_modifier)
            .fetch_one(pool)
            .await
    }

    pub async fn find_weekly_entry(
        pool: &PgPool,
        weekly_lookup_id: DbId,
        week_number: i32,
    ) -> Result<Option<WeeklyLookupEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {WEEKLY_ENTRY_COLUMNS} FROM weekly_lookup_entries \
             WHERE weekly_lookup_id = $1 AND week_number = $2"
        );
        sqlx::query_as::<_, WeeklyLookupEntry>(&query)
            .bind(weekly_lookup_id)
            .bind(week_number)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Daily
    // -----------------------------------------------------------------------

    pub async fn create_daily(pool: &PgPool, name: &str) -> Result<DailyLookup, sqlx::Error> {
        let query = format!("INSERT INTO daily_lookups (name) VALUES ($1) RETURNING {LOOKUP_COLUMNS}");
        sqlx::query_as::<_, DailyLookup>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    pub async fn add_daily_entry(
        pool: &PgPool,
        daily_lookup_id: DbId,
        input: &CreateDailyLookupEntry,
    ) -> Result<DailyLookupEntry, sqlx::Error> {
        let query = format!(
            "INSERT INTO daily_lookup_entries \
                (daily_lookup_id, day_slug, percentage, reps, percentage_modifier) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {DAILY_ENTRY_COLUMNS}"
        );
        sqlx::query_as::<_, DailyLookupEntry>(&query)
            .bind(daily_lookup_id)
            .bind(&input.day_slug)
            .bind(input.percentage)
            .bind(input.reps)
            .bind(input.percentage_modifier)
            .fetch_one(pool)
            .await
    }

    pub async fn find_daily_entry(
        pool: &PgPool,
        daily_lookup_id: DbId,
        day_slug: &str,
    ) -> Result<Option<DailyLookupEntry>, sqlx::Error> {
        let query = format!(
            "SELECT {DAILY_ENTRY_COLUMNS} FROM daily_lookup_entries \
             WHERE daily_lookup_id = $1 AND day_slug = $2"
        );
        sqlx::query_as::<_, DailyLookupEntry>(&query)
            .bind(daily_lookup_id)
            .bind(day_slug)
            .fetch_optional(pool)
            .await
    }
}
