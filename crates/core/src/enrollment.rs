//! Enrollment state machine.
//!
//! `ACTIVE` advances week by week (optionally day by day) until the cycle's
//! last week is finished, then parks in `BETWEEN_CYCLES` until the user starts
//! the next cycle. Cycle/week statuses are derived from position, never stored.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Status types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    Active,
    BetweenCycles,
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::BetweenCycles => "BETWEEN_CYCLES",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "ACTIVE" => Ok(Self::Active),
            "BETWEEN_CYCLES" => Ok(Self::BetweenCycles),
            _ => Err(CoreError::Internal(format!("Unknown enrollment status '{s}'"))),
        }
    }
}

/// Derived cycle or week status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PhaseStatus {
    Pending,
    Completed,
}

// ---------------------------------------------------------------------------
// Position + transitions
// ---------------------------------------------------------------------------

/// A user's place in their program.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EnrollmentPosition {
    pub current_week: i32,
    pub current_cycle_iteration: i32,
    pub current_day_index: Option<i32>,
    pub status: EnrollmentStatus,
}

impl EnrollmentPosition {
    /// Position of a freshly enrolled user.
    pub fn initial() -> Self {
        Self {
            current_week: 1,
            current_cycle_iteration: 1,
            current_day_index: None,
            status: EnrollmentStatus::Active,
        }
    }
}

/// Result of a successful advancement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub next: EnrollmentPosition,
    /// The week that was finished by this advancement, if any.
    pub completed_week: Option<i32>,
    /// Whether this advancement finished the cycle.
    pub cycle_completed: bool,
}

/// Derive `(cycle_status, week_status)` from a position.
pub fn derive_statuses(pos: &EnrollmentPosition) -> (PhaseStatus, PhaseStatus) {
    match pos.status {
        EnrollmentStatus::BetweenCycles => (PhaseStatus::Completed, PhaseStatus::Completed),
        EnrollmentStatus::Active => (PhaseStatus::Pending, PhaseStatus::Pending),
    }
}

fn require_active(pos: &EnrollmentPosition, op: &str) -> Result<(), CoreError> {
    if pos.status != EnrollmentStatus::Active {
        return Err(CoreError::InvalidState(format!(
            "cannot {op} while between cycles; start the next cycle first"
        )));
    }
    Ok(())
}

/// Finish the current week.
///
/// Moving past the cycle's last week parks the enrollment in
/// `BETWEEN_CYCLES` without incrementing the week counter.
pub fn advance_week(
    pos: &EnrollmentPosition,
    cycle_length_weeks: i32,
) -> Result<Transition, CoreError> {
    require_active(pos, "advance the week")?;
    if cycle_length_weeks < 1 {
        return Err(CoreError::Internal(format!(
            "cycle length must be positive, got {cycle_length_weeks}"
        )));
    }

    let completed_week = pos.current_week;
    let next = if pos.current_week + 1 > cycle_length_weeks {
        EnrollmentPosition {
            current_day_index: None,
            status: EnrollmentStatus::BetweenCycles,
            ..*pos
        }
    } else {
        EnrollmentPosition {
            current_week: pos.current_week + 1,
            current_day_index: None,
            ..*pos
        }
    };

    Ok(Transition {
        next,
        completed_week: Some(completed_week),
        cycle_completed: next.status == EnrollmentStatus::BetweenCycles,
    })
}

/// Move the day pointer forward, rolling into [`advance_week`] after the
/// week's last day.
pub fn advance_day(
    pos: &EnrollmentPosition,
    days_in_week: i32,
    cycle_length_weeks: i32,
) -> Result<Transition, CoreError> {
    require_active(pos, "advance the day")?;

    let next_index = pos.current_day_index.unwrap_or(0) + 1;
    if next_index >= days_in_week {
        return advance_week(pos, cycle_length_weeks);
    }

    Ok(Transition {
        next: EnrollmentPosition {
            current_day_index: Some(next_index),
            ..*pos
        },
        completed_week: None,
        cycle_completed: false,
    })
}

/// Start the next cycle from `BETWEEN_CYCLES`.
pub fn next_cycle(pos: &EnrollmentPosition) -> Result<Transition, CoreError> {
    if pos.status != EnrollmentStatus::BetweenCycles {
        return Err(CoreError::InvalidState(
            "next cycle is only available once the current cycle is complete".to_string(),
        ));
    }

    Ok(Transition {
        next: EnrollmentPosition {
            current_week: 1,
            current_cycle_iteration: pos.current_cycle_iteration + 1,
            current_day_index: None,
            status: EnrollmentStatus::Active,
        },
        completed_week: None,
        cycle_completed: false,
    })
}
