//! Workout session lifecycle and logged-set validation.

use rust_decimal::Decimal;

use crate::error::CoreError;
use crate::set_scheme::{MAX_REPS, MAX_RPE, MAX_SETS, MIN_RPE};

// ---------------------------------------------------------------------------
// Status constants
// ---------------------------------------------------------------------------

/// Session has been started and accepts logged sets.
pub const STATUS_IN_PROGRESS: &str = "IN_PROGRESS";
/// Session was finished normally.
pub const STATUS_COMPLETED: &str = "COMPLETED";
/// Session was abandoned before finishing.
pub const STATUS_ABANDONED: &str = "ABANDONED";

pub const VALID_STATUSES: &[&str] = &[STATUS_IN_PROGRESS, STATUS_COMPLETED, STATUS_ABANDONED];

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

/// Returns the set of statuses that `from_status` may transition to.
///
/// Only `IN_PROGRESS` sessions move; `COMPLETED` and `ABANDONED` are terminal.
pub fn valid_transitions(from_status: &str) -> &'static [&'static str] {
    match from_status {
        STATUS_IN_PROGRESS => &[STATUS_COMPLETED, STATUS_ABANDONED],
        _ => &[],
    }
}

/// Validate that a session may move from `current` to `next`.
pub fn validate_transition(current: &str, next: &str) -> Result<(), CoreError> {
    if valid_transitions(current).contains(&next) {
        Ok(())
    } else {
        Err(CoreError::InvalidState(format!(
            "Cannot move session from {current} to {next}"
        )))
    }
}

/// Validate that sets may still be logged against a session.
pub fn require_in_progress(status: &str) -> Result<(), CoreError> {
    if status == STATUS_IN_PROGRESS {
        Ok(())
    } else {
        Err(CoreError::InvalidState(format!(
            "Session is {status}; sets can only be logged while IN_PROGRESS"
        )))
    }
}

// ---------------------------------------------------------------------------
// Logged sets
// ---------------------------------------------------------------------------

/// Validate the user-reported values of a logged set.
pub fn validate_logged_set(
    set_number: i32,
    weight: Decimal,
    target_reps: i32,
    reps_performed: i32,
    rpe: Option<Decimal>,
) -> Result<(), CoreError> {
    if !(1..=MAX_SETS).contains(&set_number) {
        return Err(CoreError::Validation(format!(
            "set_number must be between 1 and {MAX_SETS}, got {set_number}"
        )));
    }
    if weight < Decimal::ZERO {
        return Err(CoreError::Validation(format!(
            "weight cannot be negative, got {weight}"
        )));
    }
    if !(0..=MAX_REPS).contains(&target_reps) || !(0..=MAX_REPS).contains(&reps_performed) {
        return Err(CoreError::Validation(format!(
            "target_reps and reps_performed must be between 0 and {MAX_REPS}"
        )));
    }
    if let Some(rpe) = rpe {
        if rpe < MIN_RPE || rpe > MAX_RPE {
            return Err(CoreError::Validation(format!(
                "rpe must be between {MIN_RPE} and {MAX_RPE}, got {rpe}"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    #[test]
    fn in_progress_can_finish_or_abandon() {
        assert!(validate_transition(STATUS_IN_PROGRESS, STATUS_COMPLETED).is_ok());
        assert!(validate_transition(STATUS_IN_PROGRESS, STATUS_ABANDONED).is_ok());
    }

    #[test]
    fn terminal_statuses_do_not_move() {
        for from in [STATUS_COMPLETED, STATUS_ABANDONED] {
            for to in VALID_STATUSES {
                assert_matches!(validate_transition(from, to), Err(CoreError::InvalidState(_)));
            }
        }
    }

    #[test]
    fn logging_requires_in_progress() {
        assert!(require_in_progress(STATUS_IN_PROGRESS).is_ok());
        assert!(require_in_progress(STATUS_COMPLETED).is_err());
    }

    #[test]
    fn logged_set_bounds() {
        assert!(validate_logged_set(1, dec!(225), 5, 0, None).is_ok());
        assert!(validate_logged_set(1, dec!(225), 5, 8, Some(dec!(8.5))).is_ok());
        assert!(validate_logged_set(0, dec!(225), 5, 5, None).is_err());
        assert!(validate_logged_set(1, dec!(-5), 5, 5, None).is_err());
        assert!(validate_logged_set(1, dec!(225), 5, -1, None).is_err());
        assert!(validate_logged_set(1, dec!(225), 5, 5, Some(dec!(0.5))).is_err());
        assert!(validate_logged_set(1, dec!(225), 5, 5, Some(dec!(10.5))).is_err());
        assert!(validate_logged_set(1, dec!(225), 5, MAX_REPS, None).is_ok());
        assert!(validate_logged_set(1, dec!(225), 5, i32::MAX, None).is_err());
        assert!(validate_logged_set(1, dec!(225), i32::MAX, 5, None).is_err());
        assert!(validate_logged_set(MAX_SETS + 1, dec!(225), 5, 5, None).is_err());
    }
}
