//! Lift entity model and DTOs.

use liftcycle_core::prescription::LiftInfo;
use liftcycle_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `lifts` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Lift {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Lift {
    /// Metadata attached to resolved prescriptions.
    pub fn info(&self) -> LiftInfo {
        LiftInfo {
            id: self.id,
            name: self.name.clone(),
            slug: self.slug.clone(),
        }
    }
}

/// DTO for creating a lift.
#[derive(Debug, Deserialize)]
pub struct CreateLift {
    pub name: String,
    pub slug: String,
}
