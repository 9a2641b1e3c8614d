use crate::lift_max::MaxType;
use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),

    // -- Engine sentinels ----------------------------------------------------
    /// The user has no max of the required type for a lift.
    #[error("No {max_type} max recorded for lift {lift_id}")]
    MaxNotFound { lift_id: DbId, max_type: MaxType },

    #[error("User is not enrolled in a program")]
    UserNotEnrolled,

    #[error("Week {week_number} not found in the program cycle")]
    WeekNotFound { week_number: i32 },

    #[error("Day '{day}' not found in the current week")]
    DayNotFound { day: String },

    /// A variable scheme was asked for its next set before any set was logged.
    #[error("No sets have been logged for this prescription in the session")]
    NoSetsLogged,

    #[error("Set scheme '{0}' does not support this operation")]
    UnsupportedScheme(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("No applicable progressions for this program")]
    NoApplicableProgressions,
}
