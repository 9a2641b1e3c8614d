//! Repository for the `lifts` table.

use liftcycle_core::types::DbId;
use sqlx::PgPool;

use crate::models::lift::{CreateLift, Lift};

const COLUMNS: &str = "id, name, slug, created_at, updated_at";

pub struct LiftRepo;

impl LiftRepo {
    pub async fn create(pool: &PgPool, input: &CreateLift) -> Result<Lift, sqlx::Error> {
        let query = format!(
            "INSERT INTO lifts (name, slug) VALUES ($1, $2) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Lift>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Lift>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lifts WHERE id = $1");
        sqlx::query_as::<_, Lift>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch several lifts at once. Missing ids are silently absent.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Lift>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM lifts WHERE id = ANY($1)");
        sqlx::query_as::<_, Lift>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }
}
