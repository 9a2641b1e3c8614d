//! Repository for `workout_sessions` and `logged_sets`.

use liftcycle_core::session::STATUS_IN_PROGRESS;
use liftcycle_core::types::DbId;
use sqlx::{PgConnection, PgPool};

use crate::models::session::{CreateLoggedSet, LoggedSet, WorkoutSession};

const SESSION_COLUMNS: &str = "\
    id, user_program_state_id, cycle_iteration, week_number, day_index, status, \
    started_at, finished_at, created_at, updated_at";

const SET_COLUMNS: &str = "\
    id, session_id, prescription_id, lift_id, set_number, weight, target_reps, \
    reps_performed, is_amrap, rpe, created_at";

pub struct SessionRepo;

impl SessionRepo {
    // -----------------------------------------------------------------------
    // Sessions
    // -----------------------------------------------------------------------

    /// Open a session. A second open session for the same enrollment
    /// violates `uq_workout_sessions_in_progress`.
    pub async fn create(
        pool: &PgPool,
        user_program_state_id: DbId,
        cycle_iteration: i32,
        week_number: i32,
        day_index: Option<i32>,
    ) -> Result<WorkoutSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO workout_sessions \
                (user_program_state_id, cycle_iteration, week_number, day_index) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {SESSION_COLUMNS}"
        );
        sqlx::query_as::<_, WorkoutSession>(&query)
            .bind(user_program_state_id)
            .bind(cycle_iteration)
            .bind(week_number)
            .bind(day_index)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<WorkoutSession>, sqlx::Error> {
        let query = format!("SELECT {SESSION_COLUMNS} FROM workout_sessions WHERE id = $1");
        sqlx::query_as::<_, WorkoutSession>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_in_progress(
        pool: &PgPool,
        user_program_state_id: DbId,
    ) -> Result<Option<WorkoutSession>, sqlx::Error> {
        let query = format!(
            "SELECT {SESSION_COLUMNS} FROM workout_sessions \
             WHERE user_program_state_id = $1 AND status = $2"
        );
        sqlx::query_as::<_, WorkoutSession>(&query)
            .bind(user_program_state_id)
            .bind(STATUS_IN_PROGRESS)
            .fetch_optional(pool)
            .await
    }

    /// Close an open session with a terminal status.
    ///
    /// The `status = IN_PROGRESS` guard makes concurrent closes race-free;
    /// `None` means the session was no longer open.
    pub async fn close(
        conn: &mut PgConnection,
        id: DbId,
        status: &str,
    ) -> Result<Option<WorkoutSession>, sqlx::Error> {
        let query = format!(
            "UPDATE workout_sessions SET status = $2, finished_at = now() \
             WHERE id = $1 AND status = $3 \
             RETURNING {SESSION_COLUMNS}"
        );
        sqlx::query_as::<_, WorkoutSession>(&query)
            .bind(id)
            .bind(status)
            .bind(STATUS_IN_PROGRESS)
            .fetch_optional(conn)
            .await
    }

    // -----------------------------------------------------------------------
    // Logged sets
    // -----------------------------------------------------------------------

    pub async fn log_set(
        pool: &PgPool,
        session_id: DbId,
        lift_id: DbId,
        input: &CreateLoggedSet,
    ) -> Result<LoggedSet, sqlx::Error> {
        let query = format!(
            "INSERT INTO logged_sets \
                (session_id, prescription_id, lift_id, set_number, weight, target_reps, \
                 reps_performed, is_amrap, rpe) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
             RETURNING {SET_COLUMNS}"
        );
        sqlx::query_as::<_, LoggedSet>(&query)
            .bind(session_id)
            .bind(input.prescription_id)
            .bind(lift_id)
            .bind(input.set_number)
            .bind(input.weight)
            .bind(input.target_reps)
            .bind(input.reps_performed)
            .bind(input.is_amrap)
            .bind(input.rpe)
            .fetch_one(pool)
            .await
    }

    /// Sets logged in a session, by set number. `prescription_id` narrows
    /// to one prescription.
    pub async fn list_sets(
        pool: &PgPool,
        session_id: DbId,
        prescription_id: Option<DbId>,
    ) -> Result<Vec<LoggedSet>, sqlx::Error> {
        let query = format!(
            "SELECT {SET_COLUMNS} FROM logged_sets \
             WHERE session_id = $1 AND ($2::uuid IS NULL OR prescription_id = $2) \
             ORDER BY set_number ASC, created_at ASC"
        );
        sqlx::query_as::<_, LoggedSet>(&query)
            .bind(session_id)
            .bind(prescription_id)
            .fetch_all(pool)
            .await
    }

    /// Distinct lifts with at least one logged set in the session.
    pub async fn logged_lift_ids(
        conn: &mut PgConnection,
        session_id: DbId,
    ) -> Result<Vec<DbId>, sqlx::Error> {
        let rows: Vec<(DbId,)> = sqlx::query_as(
            "SELECT DISTINCT lift_id FROM logged_sets WHERE session_id = $1",
        )
        .bind(session_id)
        .fetch_all(conn)
        .await?;
        Ok(rows.into_iter().map(|(id,)| id).collect())
    }
}
