//! Workout session and logged set models.

use liftcycle_core::set_scheme::LoggedSetView;
use liftcycle_core::types::{DbId, Timestamp};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `workout_sessions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WorkoutSession {
    pub id: DbId,
    pub user_program_state_id: DbId,
    pub cycle_iteration: i32,
    pub week_number: i32,
    pub day_index: Option<i32>,
    pub status: String,
    pub started_at: Timestamp,
    pub finished_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `logged_sets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct LoggedSet {
    pub id: DbId,
    pub session_id: DbId,
    pub prescription_id: DbId,
    pub lift_id: DbId,
    pub set_number: i32,
    pub weight: Decimal,
    pub target_reps: i32,
    pub reps_performed: i32,
    pub is_amrap: bool,
    pub rpe: Option<Decimal>,
    pub created_at: Timestamp,
}

impl LoggedSet {
    pub fn view(&self) -> LoggedSetView {
        LoggedSetView {
            set_number: self.set_number,
            weight: self.weight,
            reps_performed: self.reps_performed,
            rpe: self.rpe,
        }
    }
}

/// DTO for logging a performed set. The lift is taken from the prescription.
#[derive(Debug, Deserialize)]
pub struct CreateLoggedSet {
    pub prescription_id: DbId,
    pub set_number: i32,
    pub weight: Decimal,
    pub target_reps: i32,
    pub reps_performed: i32,
    #[serde(default)]
    pub is_amrap: bool,
    pub rpe: Option<Decimal>,
}
