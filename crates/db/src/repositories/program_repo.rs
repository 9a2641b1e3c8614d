//! Repository for cycles, cycle weeks, programs, days, and week/day slots.

use liftcycle_core::types::DbId;
use sqlx::PgPool;

use crate::models::program::{
    CreateCycle, CreateCycleWeek, CreateDay, CreateProgram, CreateWeekDay, Cycle, CycleWeek, Day,
    Program, ScheduledDay,
};

const CYCLE_COLUMNS: &str = "id, name, length_weeks, created_at, updated_at";

const WEEK_COLUMNS: &str = "id, cycle_id, week_number, name, created_at, updated_at";

const PROGRAM_COLUMNS: &str = "\
    id, name, slug, cycle_id, weekly_lookup_id, daily_lookup_id, created_at, updated_at";

const DAY_COLUMNS: &str = "id, program_id, name, slug, created_at, updated_at";

pub struct ProgramRepo;

impl ProgramRepo {
    // -----------------------------------------------------------------------
    // Cycles
    // -----------------------------------------------------------------------

    pub async fn create_cycle(pool: &PgPool, input: &CreateCycle) -> Result<Cycle, sqlx::Error> {
        let query = format!(
            "INSERT INTO cycles (name, length_weeks) VALUES ($1, $2) RETURNING {CYCLE_COLUMNS}"
        );
        sqlx::query_as::<_, Cycle>(&query)
            .bind(&input.name)
            .bind(input.length_weeks)
            .fetch_one(pool)
            .await
    }

    pub async fn find_cycle(pool: &PgPool, id: DbId) -> Result<Option<Cycle>, sqlx::Error> {
        let query = format!("SELECT {CYCLE_COLUMNS} FROM cycles WHERE id = $1");
        sqlx::query_as::<_, Cycle>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn create_week(
        pool: &PgPool,
        input: &CreateCycleWeek,
    ) -> Result<CycleWeek, sqlx::Error> {
        let query = format!(
            "INSERT INTO cycle_weeks (cycle_id, week_number, name) \
             VALUES ($1, $2, $3) \
             RETURNING {WEEK_COLUMNS}"
        );
        sqlx::query_as::<_, CycleWeek>(&query)
            .bind(input.cycle_id)
            .bind(input.week_number)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Find a cycle's week by its 1-based number.
    pub async fn find_week(
        pool: &PgPool,
        cycle_id: DbId,
        week_number: i32,
    ) -> Result<Option<CycleWeek>, sqlx::Error> {
        let query = format!(
            "SELECT {WEEK_COLUMNS} FROM cycle_weeks WHERE cycle_id = $1 AND week_number = $2"
        );
        sqlx::query_as::<_, CycleWeek>(&query)
            .bind(cycle_id)
            .bind(week_number)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Programs
    // -----------------------------------------------------------------------

    pub async fn create(pool: &PgPool, input: &CreateProgram) -> Result<Program, sqlx::Error> {
        let query = format!(
            "INSERT INTO programs (name, slug, cycle_id, weekly_lookup_id, daily_lookup_id) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {PROGRAM_COLUMNS}"
        );
        sqlx::query_as::<_, Program>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(input.cycle_id)
            .bind(input.weekly_lookup_id)
            .bind(input.daily_lookup_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Program>, sqlx::Error> {
        let query = format!("SELECT {PROGRAM_COLUMNS} FROM programs WHERE id = $1");
        sqlx::query_as::<_, Program>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    // -----------------------------------------------------------------------
    // Days
    // -----------------------------------------------------------------------

    pub async fn create_day(pool: &PgPool, input: &CreateDay) -> Result<Day, sqlx::Error> {
        let query = format!(
            "INSERT INTO days (program_id, name, slug) VALUES ($1, $2, $3) RETURNING {DAY_COLUMNS}"
        );
        sqlx::query_as::<_, Day>(&query)
            .bind(input.program_id)
            .bind(&input.name)
            .bind(&input.slug)
            .fetch_one(pool)
            .await
    }

    pub async fn find_day(pool: &PgPool, id: DbId) -> Result<Option<Day>, sqlx::Error> {
        let query = format!("SELECT {DAY_COLUMNS} FROM days WHERE id = $1");
        sqlx::query_as::<_, Day>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Schedule a day at a position within a week. Returns the new slot id.
    pub async fn add_day_to_week(pool: &PgPool, input: &CreateWeekDay) -> Result<DbId, sqlx::Error> {
        let (id,): (DbId,) = sqlx::query_as(
            "INSERT INTO week_days (week_id, day_id, position) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(input.week_id)
        .bind(input.day_id)
        .bind(input.position)
        .fetch_one(pool)
        .await?;
        Ok(id)
    }

    /// Days scheduled in a week, ordered by position.
    pub async fn list_days_for_week(
        pool: &PgPool,
        week_id: DbId,
    ) -> Result<Vec<ScheduledDay>, sqlx::Error> {
        sqlx::query_as::<_, ScheduledDay>(
            "SELECT d.id AS day_id, d.name, d.slug, wd.position \
             FROM week_days wd \
             JOIN days d ON d.id = wd.day_id \
             WHERE wd.week_id = $1 \
             ORDER BY wd.position ASC",
        )
        .bind(week_id)
        .fetch_all(pool)
        .await
    }
}
