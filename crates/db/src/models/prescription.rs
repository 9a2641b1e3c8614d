//! Prescription entity model and DTOs.
//!
//! Load strategies and set schemes are stored as tagged JSONB documents and
//! decoded straight into the core sum types.

use liftcycle_core::load_strategy::LoadStrategy;
use liftcycle_core::prescription::Prescription as DomainPrescription;
use liftcycle_core::set_scheme::SetScheme;
use liftcycle_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `prescriptions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Prescription {
    pub id: DbId,
    pub day_id: DbId,
    pub lift_id: DbId,
    pub load_strategy: Json<LoadStrategy>,
    pub set_scheme: Json<SetScheme>,
    pub sort_order: i32,
    pub notes: Option<String>,
    pub rest_seconds: Option<i32>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Prescription {
    pub fn to_domain(&self) -> DomainPrescription {
        DomainPrescription {
            id: self.id,
            lift_id: self.lift_id,
            load_strategy: self.load_strategy.0.clone(),
            set_scheme: self.set_scheme.0.clone(),
            sort_order: self.sort_order,
            notes: self.notes.clone(),
            rest_seconds: self.rest_seconds,
        }
    }
}

/// DTO for creating a prescription.
#[derive(Debug, Deserialize)]
pub struct CreatePrescription {
    pub day_id: DbId,
    pub lift_id: DbId,
    pub load_strategy: LoadStrategy,
    pub set_scheme: SetScheme,
    pub sort_order: Option<i32>,
    pub notes: Option<String>,
    pub rest_seconds: Option<i32>,
}
