//! Progression rules, trigger compatibility, and idempotency period keys.
//!
//! Application itself (reading maxes, writing new maxes and history) lives in
//! the API engine layer; this module holds the rules it applies.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::lift_max::MaxType;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Skip reasons
// ---------------------------------------------------------------------------

pub const SKIP_NO_CURRENT_MAX: &str = "no_current_max";
pub const SKIP_DISABLED: &str = "progression_disabled";
pub const SKIP_ALREADY_APPLIED: &str = "already_applied_this_period";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressionType {
    LinearProgression,
    CycleProgression,
}

const VALID_PROGRESSION_TYPES: &[&str] = &["LINEAR_PROGRESSION", "CYCLE_PROGRESSION"];

impl ProgressionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LinearProgression => "LINEAR_PROGRESSION",
            Self::CycleProgression => "CYCLE_PROGRESSION",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "LINEAR_PROGRESSION" => Ok(Self::LinearProgression),
            "CYCLE_PROGRESSION" => Ok(Self::CycleProgression),
            _ => Err(CoreError::Validation(format!(
                "Invalid progression type '{s}'. Must be one of: {}",
                VALID_PROGRESSION_TYPES.join(", ")
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerType {
    AfterSession,
    AfterWeek,
    AfterCycle,
}

impl TriggerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AfterSession => "AFTER_SESSION",
            Self::AfterWeek => "AFTER_WEEK",
            Self::AfterCycle => "AFTER_CYCLE",
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "AFTER_SESSION" => Ok(Self::AfterSession),
            "AFTER_WEEK" => Ok(Self::AfterWeek),
            "AFTER_CYCLE" => Ok(Self::AfterCycle),
            _ => Err(CoreError::Validation(format!(
                "Invalid trigger type '{s}'. Must be one of: AFTER_SESSION, AFTER_WEEK, AFTER_CYCLE"
            ))),
        }
    }
}

impl fmt::Display for TriggerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters stored with every progression.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProgressionParameters {
    pub increment: Decimal,
    pub max_type: MaxType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trigger_type: Option<TriggerType>,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a progression definition at creation time.
///
/// Linear progressions must fire after a session or a week. Cycle
/// progressions are implicitly cycle-scoped and take no trigger type.
pub fn validate_progression(
    kind: ProgressionType,
    params: &ProgressionParameters,
) -> Result<(), CoreError> {
    if params.increment <= Decimal::ZERO {
        return Err(CoreError::Validation(format!(
            "increment must be greater than zero, got {}",
            params.increment
        )));
    }

    match (kind, params.trigger_type) {
        (ProgressionType::LinearProgression, Some(TriggerType::AfterSession))
        | (ProgressionType::LinearProgression, Some(TriggerType::AfterWeek)) => Ok(()),
        (ProgressionType::LinearProgression, Some(other)) => Err(CoreError::Validation(format!(
            "LINEAR_PROGRESSION does not support trigger type {other}; use AFTER_SESSION or AFTER_WEEK"
        ))),
        (ProgressionType::LinearProgression, None) => Err(CoreError::Validation(
            "LINEAR_PROGRESSION requires trigger_type AFTER_SESSION or AFTER_WEEK".to_string(),
        )),
        (ProgressionType::CycleProgression, None) => Ok(()),
        (ProgressionType::CycleProgression, Some(_)) => Err(CoreError::Validation(
            "CYCLE_PROGRESSION is cycle-scoped and does not accept a trigger_type".to_string(),
        )),
    }
}

/// The trigger a progression responds to.
pub fn effective_trigger(
    kind: ProgressionType,
    params: &ProgressionParameters,
) -> Result<TriggerType, CoreError> {
    match kind {
        ProgressionType::CycleProgression => Ok(TriggerType::AfterCycle),
        ProgressionType::LinearProgression => params.trigger_type.ok_or_else(|| {
            CoreError::Internal("linear progression stored without trigger_type".to_string())
        }),
    }
}

// ---------------------------------------------------------------------------
// Periods
// ---------------------------------------------------------------------------

/// Where in the program a trigger fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TriggerPosition {
    pub cycle_iteration: i32,
    pub week_number: i32,
    pub day_index: Option<i32>,
}

/// Key identifying the period a trigger belongs to.
///
/// At most one non-forced application per (user, progression, lift, key).
pub fn period_key(trigger: TriggerType, pos: &TriggerPosition) -> String {
    match trigger {
        TriggerType::AfterSession => format!(
            "session:c{}:w{}:d{}",
            pos.cycle_iteration,
            pos.week_number,
            pos.day_index.unwrap_or(0)
        ),
        TriggerType::AfterWeek => format!("week:c{}:w{}", pos.cycle_iteration, pos.week_number),
        TriggerType::AfterCycle => format!("cycle:c{}", pos.cycle_iteration),
    }
}

/// Key for AFTER_SESSION progressions fired by finishing a session. Each
/// finished session is its own period, however many share a program day.
pub fn session_period_key(session_id: DbId) -> String {
    format!("session:{session_id}")
}

// ---------------------------------------------------------------------------
// Application
// ---------------------------------------------------------------------------

/// Compute `(new_value, delta)` for an application.
///
/// The delta is the progression's increment regardless of progression type.
pub fn compute_new_value(previous: Decimal, params: &ProgressionParameters) -> (Decimal, Decimal) {
    let delta = params.increment;
    ((previous + delta).normalize(), delta)
}

/// Outcome of applying a progression to one lift.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiftResult {
    pub lift_id: DbId,
    pub applied: bool,
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub previous_value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_value: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<Decimal>,
}

impl LiftResult {
    pub fn applied(lift_id: DbId, previous: Decimal, new_value: Decimal, delta: Decimal) -> Self {
        Self {
            lift_id,
            applied: true,
            skipped: false,
            skip_reason: None,
            error: None,
            previous_value: Some(previous),
            new_value: Some(new_value),
            delta: Some(delta),
        }
    }

    pub fn skipped(lift_id: DbId, reason: &str) -> Self {
        Self {
            lift_id,
            applied: false,
            skipped: true,
            skip_reason: Some(reason.to_string()),
            error: None,
            previous_value: None,
            new_value: None,
            delta: None,
        }
    }

    pub fn errored(lift_id: DbId, error: String) -> Self {
        Self {
            lift_id,
            applied: false,
            skipped: false,
            skip_reason: None,
            error: Some(error),
            previous_value: None,
            new_value: None,
            delta: None,
        }
    }
}

/// Aggregated outcome of one trigger across all targeted lifts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TriggerResult {
    pub progression_id: DbId,
    pub trigger_type: TriggerType,
    pub results: Vec<LiftResult>,
    pub total_applied: usize,
    pub total_skipped: usize,
    pub total_errors: usize,
}

impl TriggerResult {
    /// Build the aggregate, preserving the order of `results`.
    pub fn from_results(
        progression_id: DbId,
        trigger_type: TriggerType,
        results: Vec<LiftResult>,
    ) -> Self {
        let total_applied = results.iter().filter(|r| r.applied).count();
        let total_skipped = results.iter().filter(|r| r.skipped).count();
        let total_errors = results.iter().filter(|r| r.error.is_some()).count();
        Self {
            progression_id,
            trigger_type,
            results,
            total_applied,
            total_skipped,
            total_errors,
        }
    }
}
