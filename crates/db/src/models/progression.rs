//! Progression, program-progression link, and progression history models.

use liftcycle_core::error::CoreError;
use liftcycle_core::lift_max::MaxType;
use liftcycle_core::progression::{ProgressionParameters, ProgressionType, TriggerType};
use liftcycle_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Progressions
// ---------------------------------------------------------------------------

/// A row from the `progressions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Progression {
    pub id: DbId,
    pub name: String,
    pub progression_type: String,
    pub increment: Decimal,
    pub max_type: String,
    pub trigger_type: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Progression {
    pub fn kind(&self) -> Result<ProgressionType, CoreError> {
        ProgressionType::from_str(&self.progression_type)
    }

    pub fn parameters(&self) -> Result<ProgressionParameters, CoreError> {
        Ok(ProgressionParameters {
            increment: self.increment,
            max_type: MaxType::from_str(&self.max_type)?,
            trigger_type: self
                .trigger_type
                .as_deref()
                .map(TriggerType::from_str)
                .transpose()?,
        })
    }
}

/// DTO for creating a progression.
#[derive(Debug, Deserialize)]
pub struct CreateProgression {
    pub name: String,
    pub progression_type: ProgressionType,
    pub parameters: ProgressionParameters,
}

// ---------------------------------------------------------------------------
// Program links
// ---------------------------------------------------------------------------

/// A row from the `program_progressions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProgramProgression {
    pub id: DbId,
    pub program_id: DbId,
    pub progression_id: DbId,
    pub lift_id: DbId,
    pub priority: i32,
    pub enabled: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO linking a progression to one lift of a program.
#[derive(Debug, Deserialize)]
pub struct CreateProgramProgression {
    pub progression_id: DbId,
    pub lift_id: DbId,
    pub priority: Option<i32>,
    pub enabled: Option<bool>,
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// A row from the `progression_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProgressionHistory {
    pub id: DbId,
    pub user_id: DbId,
    pub user_program_state_id: DbId,
    pub progression_id: DbId,
    pub lift_id: DbId,
    pub lift_max_id: Option<DbId>,
    pub previous_value: Decimal,
    pub new_value: Decimal,
    pub delta: Decimal,
    pub trigger_type: String,
    pub trigger_context: serde_json::Value,
    pub period_key: String,
    pub forced: bool,
    pub applied_at: Timestamp,
    pub created_at: Timestamp,
}

/// Insert payload for a history row. Built by the progression engine only.
#[derive(Debug)]
pub struct NewProgressionHistory<'a> {
    pub user_id: DbId,
    pub user_program_state_id: DbId,
    pub progression_id: DbId,
    pub lift_id: DbId,
    pub lift_max_id: DbId,
    pub previous_value: Decimal,
    pub new_value: Decimal,
    pub delta: Decimal,
    pub trigger_type: TriggerType,
    pub trigger_context: &'a serde_json::Value,
    pub period_key: &'a str,
    pub forced: bool,
}

/// Query parameters for listing progression history.
#[derive(Debug, Deserialize)]
pub struct ProgressionHistoryListParams {
    pub lift_id: Option<DbId>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
