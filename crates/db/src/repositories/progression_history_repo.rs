//! Repository for the append-only `progression_history` table.

use liftcycle_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::progression::{NewProgressionHistory, ProgressionHistory};

const COLUMNS: &str = "\
    id, user_id, user_program_state_id, progression_id, lift_id, lift_max_id, \
    previous_value, new_value, delta, trigger_type, trigger_context, period_key, forced, \
    applied_at, created_at";

pub struct ProgressionHistoryRepo;

impl ProgressionHistoryRepo {
    pub async fn create(
        conn: &mut PgConnection,
        input: &NewProgressionHistory<'_>,
    ) -> Result<ProgressionHistory, sqlx::Error> {
        let query = format!(
            "INSERT INTO progression_history \
                (user_id, user_program_state_id, progression_id, lift_id, lift_max_id, \
                 previous_value, new_value, delta, trigger_type, trigger_context, period_key, forced) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProgressionHistory>(&query)
            .bind(input.user_id)
            .bind(input.user_program_state_id)
            .bind(input.progression_id)
            .bind(input.lift_id)
            .bind(input.lift_max_id)
            .bind(input.previous_value)
            .bind(input.new_value)
            .bind(input.delta)
            .bind(input.trigger_type.as_str())
            .bind(input.trigger_context)
            .bind(input.period_key)
            .bind(input.forced)
            .fetch_one(conn)
            .await
    }

    /// Whether this progression already applied to the lift in the period of
    /// the given enrollment. Periods of earlier enrollments do not count.
    pub async fn exists_for_period(
        conn: &mut PgConnection,
        user_program_state_id: DbId,
        progression_id: DbId,
        lift_id: DbId,
        period_key: &str,
    ) -> Result<bool, sqlx::Error> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS ( \
                SELECT 1 FROM progression_history \
                WHERE user_program_state_id = $1 AND progression_id = $2 AND lift_id = $3 AND period_key = $4 \
             )",
        )
        .bind(user_program_state_id)
        .bind(progression_id)
        .bind(lift_id)
        .bind(period_key)
        .fetch_one(conn)
        .await?;
        Ok(exists)
    }

    /// A user's history, newest first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        lift_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ProgressionHistory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM progression_history \
             WHERE user_id = $1 AND ($2::uuid IS NULL OR lift_id = $2) \
             ORDER BY applied_at DESC \
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, ProgressionHistory>(&query)
            .bind(user_id)
            .bind(lift_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
