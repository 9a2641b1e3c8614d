//! Lift max entity model and DTOs.

use liftcycle_core::error::CoreError;
use liftcycle_core::lift_max::{MaxRecord, MaxType};
use liftcycle_core::types::{Date, DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `lift_maxes` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LiftMax {
    pub id: DbId,
    pub user_id: DbId,
    pub lift_id: DbId,
    pub max_type: String,
    pub value: Decimal,
    pub effective_date: Date,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl LiftMax {
    pub fn max_type(&self) -> Result<MaxType, CoreError> {
        MaxType::from_str(&self.max_type)
    }

    pub fn record(&self) -> MaxRecord {
        MaxRecord {
            value: self.value,
            effective_date: self.effective_date,
            created_at: self.created_at,
        }
    }
}

/// DTO for recording a new max. `effective_date` defaults to today.
#[derive(Debug, Deserialize)]
pub struct CreateLiftMax {
    pub lift_id: DbId,
    pub max_type: MaxType,
    pub value: Decimal,
    pub effective_date: Option<Date>,
}

/// DTO for editing a max. Only value and effective date are mutable.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateLiftMax {
    pub value: Option<Decimal>,
    pub effective_date: Option<Date>,
}
