//! Repository for the `prescriptions` table.

use liftcycle_core::types::DbId;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::models::prescription::{CreatePrescription, Prescription};

const COLUMNS: &str = "\
    id, day_id, lift_id, load_strategy, set_scheme, sort_order, notes, rest_seconds, \
    created_at, updated_at";

pub struct PrescriptionRepo;

impl PrescriptionRepo {
    /// Insert a prescription. Callers validate strategy and scheme first.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePrescription,
    ) -> Result<Prescription, sqlx::Error> {
        let query = format!(
            "INSERT INTO prescriptions \
                (day_id, lift_id, load_strategy, set_scheme, sort_order, notes, rest_seconds) \
             VALUES ($1, $2, $3, $4, COALESCE($5, 0), $6, $7) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Prescription>(&query)
            .bind(input.day_id)
            .bind(input.lift_id)
            .bind(Json(&input.load_strategy))
            .bind(Json(&input.set_scheme))
            .bind(input.sort_order)
            .bind(&input.notes)
            .bind(input.rest_seconds)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Prescription>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM prescriptions WHERE id = $1");
        sqlx::query_as::<_, Prescription>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch several prescriptions. Order follows the database, not `ids`.
    pub async fn find_by_ids(
        pool: &PgPool,
        ids: &[DbId],
    ) -> Result<Vec<Prescription>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM prescriptions WHERE id = ANY($1)");
        sqlx::query_as::<_, Prescription>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// A day's prescriptions in declared order.
    pub async fn list_for_day(
        pool: &PgPool,
        day_id: DbId,
    ) -> Result<Vec<Prescription>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM prescriptions \
             WHERE day_id = $1 \
             ORDER BY sort_order ASC, created_at ASC"
        );
        sqlx::query_as::<_, Prescription>(&query)
            .bind(day_id)
            .fetch_all(pool)
            .await
    }

    /// Find the program a prescription belongs to.
    pub async fn find_program_id(pool: &PgPool, id: DbId) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as(
            "SELECT d.program_id FROM prescriptions p JOIN days d ON d.id = p.day_id WHERE p.id = $1",
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(program_id,)| program_id))
    }
}
