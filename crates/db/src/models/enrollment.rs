//! User program state (enrollment) model.

use liftcycle_core::enrollment::{EnrollmentPosition, EnrollmentStatus};
use liftcycle_core::error::CoreError;
use liftcycle_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `user_program_state` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct UserProgramState {
    pub id: DbId,
    pub user_id: DbId,
    pub program_id: DbId,
    pub current_week: i32,
    pub current_cycle_iteration: i32,
    pub current_day_index: Option<i32>,
    pub enrollment_status: String,
    pub enrolled_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserProgramState {
    pub fn position(&self) -> Result<EnrollmentPosition, CoreError> {
        Ok(EnrollmentPosition {
            current_week: self.current_week,
            current_cycle_iteration: self.current_cycle_iteration,
            current_day_index: self.current_day_index,
            status: EnrollmentStatus::from_str(&self.enrollment_status)?,
        })
    }
}
