//! Repository for the `user_program_state` table.

use liftcycle_core::enrollment::EnrollmentPosition;
use liftcycle_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::enrollment::UserProgramState;

const COLUMNS: &str = "\
    id, user_id, program_id, current_week, current_cycle_iteration, current_day_index, \
    enrollment_status, enrolled_at, created_at, updated_at";

pub struct EnrollmentRepo;

impl EnrollmentRepo {
    /// Enroll a user, replacing any prior enrollment and its sessions.
    pub async fn enroll(
        pool: &PgPool,
        user_id: DbId,
        program_id: DbId,
    ) -> Result<UserProgramState, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let replaced = sqlx::query("DELETE FROM user_program_state WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?
            .rows_affected();
        if replaced > 0 {
            tracing::debug!(%user_id, "Replacing existing enrollment");
        }

        let query = format!(
            "INSERT INTO user_program_state (user_id, program_id) \
             VALUES ($1, $2) \
             RETURNING {COLUMNS}"
        );
        let state = sqlx::query_as::<_, UserProgramState>(&query)
            .bind(user_id)
            .bind(program_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(state)
    }

    pub async fn find_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<UserProgramState>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM user_program_state WHERE user_id = $1");
        sqlx::query_as::<_, UserProgramState>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Load and row-lock the user's state for the rest of the transaction.
    pub async fn find_by_user_for_update(
        conn: &mut PgConnection,
        user_id: DbId,
    ) -> Result<Option<UserProgramState>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM user_program_state WHERE user_id = $1 FOR UPDATE"
        );
        sqlx::query_as::<_, UserProgramState>(&query)
            .bind(user_id)
            .fetch_optional(conn)
            .await
    }

    /// Persist a new position.
    pub async fn update_position(
        conn: &mut PgConnection,
        id: DbId,
        pos: &EnrollmentPosition,
    ) -> Result<UserProgramState, sqlx::Error> {
        let query = format!(
            "UPDATE user_program_state SET \
                current_week = $2, \
                current_cycle_iteration = $3, \
                current_day_index = $4, \
                enrollment_status = $5 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, UserProgramState>(&query)
            .bind(id)
            .bind(pos.current_week)
            .bind(pos.current_cycle_iteration)
            .bind(pos.current_day_index)
            .bind(pos.status.as_str())
            .fetch_one(conn)
            .await
    }

    /// Remove the user's enrollment. Returns `true` if a row was deleted.
    pub async fn delete_by_user(pool: &PgPool, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM user_program_state WHERE user_id = $1")
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
