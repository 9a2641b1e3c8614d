//! Repository for the `lift_maxes` table.
//!
//! `find_current` encodes the current-max rule: latest effective date on or
//! before the as-of date, ties broken by the most recently created row.

use liftcycle_core::lift_max::MaxType;
use liftcycle_core::types::{Date, DbId};
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::lift_max::{LiftMax, UpdateLiftMax};

const COLUMNS: &str = "\
    id, user_id, lift_id, max_type, value, effective_date, created_at, updated_at";

pub struct LiftMaxRepo;

impl LiftMaxRepo {
    /// Insert a max record. Usable on a pool or inside a transaction.
    pub async fn create<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
        lift_id: DbId,
        max_type: MaxType,
        value: Decimal,
        effective_date: Date,
    ) -> Result<LiftMax, sqlx::Error> {
        let query = format!(
            "INSERT INTO lift_maxes (user_id, lift_id, max_type, value, effective_date) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LiftMax>(&query)
            .bind(user_id)
            .bind(lift_id)
            .bind(max_type.as_str())
            .bind(value)
            .bind(effective_date)
            .fetch_one(executor)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<LiftMax>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lift_maxes WHERE id = $1");
        sqlx::query_as::<_, LiftMax>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// The current max of a type as of a date, if any.
    pub async fn find_current<'e>(
        executor: impl PgExecutor<'e>,
        user_id: DbId,
        lift_id: DbId,
        max_type: MaxType,
        as_of: Date,
    ) -> Result<Option<LiftMax>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lift_maxes \
             WHERE user_id = $1 AND lift_id = $2 AND max_type = $3 AND effective_date <= $4 \
             ORDER BY effective_date DESC, created_at DESC \
             LIMIT 1"
        );
        sqlx::query_as::<_, LiftMax>(&query)
            .bind(user_id)
            .bind(lift_id)
            .bind(max_type.as_str())
            .bind(as_of)
            .fetch_optional(executor)
            .await
    }

    /// A user's max history, newest first, optionally filtered to one lift.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
        lift_id: Option<DbId>,
    ) -> Result<Vec<LiftMax>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM lift_maxes \
             WHERE user_id = $1 AND ($2::uuid IS NULL OR lift_id = $2) \
             ORDER BY effective_date DESC, created_at DESC"
        );
        sqlx::query_as::<_, LiftMax>(&query)
            .bind(user_id)
            .bind(lift_id)
            .fetch_all(pool)
            .await
    }

    /// Edit value and/or effective date. Returns `None` if the row is gone.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateLiftMax,
    ) -> Result<Option<LiftMax>, sqlx::Error> {
        let query = format!(
            "UPDATE lift_maxes SET \
                value = COALESCE($2, value), \
                effective_date = COALESCE($3, effective_date) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, LiftMax>(&query)
            .bind(id)
            .bind(input.value)
            .bind(input.effective_date)
            .fetch_optional(pool)
            .await
    }

    /// Serialize writers of one (user, lift, type) max series until the
    /// surrounding transaction ends.
    pub async fn lock_series(
        conn: &mut PgConnection,
        user_id: DbId,
        lift_id: DbId,
        max_type: MaxType,
    ) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(format!("lift_max:{user_id}:{lift_id}:{}", max_type.as_str()))
            .execute(conn)
            .await?;
        Ok(())
    }
}
