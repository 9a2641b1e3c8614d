//! Set schemes: turning a resolved weight into a concrete list of sets.
//!
//! `FIXED` and `RAMP` are stateless and fully generated up front. `MRS` and
//! `FATIGUE_DROP` are variable: generation only yields the opening set, and
//! each following set is computed by [`next_set`] from what the user has
//! logged so far in the session.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::load_strategy::validate_percentage;
use crate::rounding::Rounding;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lowest accepted RPE value.
pub const MIN_RPE: Decimal = Decimal::ONE;

/// Highest accepted RPE value.
pub const MAX_RPE: Decimal = Decimal::TEN;

/// Most sets one prescription may produce. Also caps ramp steps and logged
/// set numbers.
pub const MAX_SETS: i32 = 50;

/// Most reps in a single set.
pub const MAX_REPS: i32 = 1000;

// ---------------------------------------------------------------------------
// Scheme variants
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixedScheme {
    pub sets: i32,
    pub reps: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RampStep {
    pub percentage: Decimal,
    pub reps: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RampScheme {
    pub steps: Vec<RampStep>,
    pub work_set_threshold: Decimal,
}

/// Max-rep sets: repeat sets at one weight until a rep total is reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MrsScheme {
    pub target_total_reps: i32,
    pub min_reps_per_set: i32,
    pub max_sets: i32,
}

/// Fatigue drops: reduce the weight after every set until the reported RPE
/// reaches `stop_rpe`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatigueDropScheme {
    pub target_reps: i32,
    pub start_rpe: Decimal,
    pub stop_rpe: Decimal,
    pub drop_percent: Decimal,
    pub max_sets: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SetScheme {
    Fixed(FixedScheme),
    Ramp(RampScheme),
    #[serde(rename = "MRS")]
    Mrs(MrsScheme),
    FatigueDrop(FatigueDropScheme),
}

impl SetScheme {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fixed(_) => "FIXED",
            Self::Ramp(_) => "RAMP",
            Self::Mrs(_) => "MRS",
            Self::FatigueDrop(_) => "FATIGUE_DROP",
        }
    }

    /// Whether following sets depend on logged session history.
    pub fn is_variable(&self) -> bool {
        matches!(self, Self::Mrs(_) | Self::FatigueDrop(_))
    }
}

// ---------------------------------------------------------------------------
// Generated output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedSet {
    pub set_number: i32,
    pub weight: Decimal,
    pub target_reps: i32,
    pub is_work_set: bool,
    pub is_amrap: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_rpe: Option<Decimal>,
}

/// Inputs shared by every scheme during up-front generation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationContext {
    /// Weight resolved by the prescription's load strategy.
    pub base_weight: Decimal,
    /// The max value the load strategy resolved against. Ramp steps are
    /// percentages of this value.
    pub max_basis: Decimal,
    pub rounding: Rounding,
    /// Reps dictated by a lookup table, replacing a fixed scheme's reps.
    pub reps_override: Option<i32>,
}

/// A set already logged in the current session, as seen by [`next_set`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoggedSetView {
    pub set_number: i32,
    pub weight: Decimal,
    pub reps_performed: i32,
    pub rpe: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TerminationReason {
    TargetReached,
    MaxSetsReached,
    FatigueThresholdReached,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NextSetResult {
    pub is_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub termination_reason: Option<TerminationReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_set: Option<GeneratedSet>,
    pub total_reps_completed: i32,
    pub sets_completed: i32,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn require_in_range(field: &str, value: i32, max: i32) -> Result<(), CoreError> {
    if !(1..=max).contains(&value) {
        return Err(CoreError::Validation(format!(
            "{field} must be between 1 and {max}, got {value}"
        )));
    }
    Ok(())
}

/// Per-set rep count, 1 to [`MAX_REPS`].
pub fn validate_reps(field: &str, reps: i32) -> Result<(), CoreError> {
    require_in_range(field, reps, MAX_REPS)
}

fn validate_rpe(field: &str, rpe: Decimal) -> Result<(), CoreError> {
    if rpe < MIN_RPE || rpe > MAX_RPE {
        return Err(CoreError::Validation(format!(
            "{field} must be between {MIN_RPE} and {MAX_RPE}, got {rpe}"
        )));
    }
    Ok(())
}

/// Validate a scheme definition at creation time.
pub fn validate_scheme(scheme: &SetScheme) -> Result<(), CoreError> {
    match scheme {
        SetScheme::Fixed(s) => {
            require_in_range("sets", s.sets, MAX_SETS)?;
            validate_reps("reps", s.reps)?;
        }
        SetScheme::Ramp(s) => {
            if s.steps.is_empty() || s.steps.len() > MAX_SETS as usize {
                return Err(CoreError::Validation(format!(
                    "ramp scheme must have between 1 and {MAX_SETS} steps, got {}",
                    s.steps.len()
                )));
            }
            for step in &s.steps {
                validate_percentage(step.percentage)?;
                validate_reps("reps", step.reps)?;
            }
            if s.work_set_threshold < Decimal::ZERO || s.work_set_threshold > Decimal::ONE_HUNDRED {
                return Err(CoreError::Validation(format!(
                    "work_set_threshold must be between 0 and 100, got {}",
                    s.work_set_threshold
                )));
            }
        }
        SetScheme::Mrs(s) => {
            require_in_range("target_total_reps", s.target_total_reps, MAX_SETS * MAX_REPS)?;
            validate_reps("min_reps_per_set", s.min_reps_per_set)?;
            require_in_range("max_sets", s.max_sets, MAX_SETS)?;
            if s.min_reps_per_set > s.target_total_reps {
                return Err(CoreError::Validation(
                    "min_reps_per_set cannot exceed target_total_reps".to_string(),
                ));
            }
        }
        SetScheme::FatigueDrop(s) => {
            validate_reps("target_reps", s.target_reps)?;
            require_in_range("max_sets", s.max_sets, MAX_SETS)?;
            validate_rpe("start_rpe", s.start_rpe)?;
            validate_rpe("stop_rpe", s.stop_rpe)?;
            if s.start_rpe > s.stop_rpe {
                return Err(CoreError::Validation(
                    "start_rpe cannot exceed stop_rpe".to_string(),
                ));
            }
            if s.drop_percent <= Decimal::ZERO || s.drop_percent >= Decimal::ONE_HUNDRED {
                return Err(CoreError::Validation(format!(
                    "drop_percent must be between 0 and 100 exclusive, got {}",
                    s.drop_percent
                )));
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

/// Ceiling division for positive integers.
fn div_ceil(numerator: i32, denominator: i32) -> i32 {
    numerator / denominator + i32::from(numerator % denominator != 0)
}

/// Generate the sets known up front for a scheme.
///
/// Variable schemes yield only their opening set.
pub fn generate_sets(
    scheme: &SetScheme,
    ctx: &GenerationContext,
) -> Result<Vec<GeneratedSet>, CoreError> {
    match scheme {
        SetScheme::Fixed(s) => {
            let reps = ctx.reps_override.unwrap_or(s.reps);
            Ok((1..=s.sets)
                .map(|n| GeneratedSet {
                    set_number: n,
                    weight: ctx.base_weight,
                    target_reps: reps,
                    is_work_set: true,
                    is_amrap: false,
                    target_rpe: None,
                })
                .collect())
        }
        SetScheme::Ramp(s) => s
            .steps
            .iter()
            .zip(1..)
            .map(|(step, n)| {
                let raw = ctx.max_basis * step.percentage / Decimal::ONE_HUNDRED;
                Ok(GeneratedSet {
                    set_number: n,
                    weight: ctx.rounding.apply(raw)?,
                    target_reps: step.reps,
                    is_work_set: step.percentage >= s.work_set_threshold,
                    is_amrap: false,
                    target_rpe: None,
                })
            })
            .collect(),
        SetScheme::Mrs(s) => {
            let opening = s
                .min_reps_per_set
                .max(div_ceil(s.target_total_reps, s.max_sets.max(1)));
            Ok(vec![GeneratedSet {
                set_number: 1,
                weight: ctx.base_weight,
                target_reps: opening,
                is_work_set: true,
                is_amrap: true,
                target_rpe: None,
            }])
        }
        SetScheme::FatigueDrop(s) => Ok(vec![GeneratedSet {
            set_number: 1,
            weight: ctx.base_weight,
            target_reps: s.target_reps,
            is_work_set: true,
            is_amrap: false,
            target_rpe: Some(s.start_rpe),
        }]),
    }
}

/// Compute the next set of a variable scheme from the session's logged sets.
///
/// Fails with [`CoreError::UnsupportedScheme`] for stateless schemes and with
/// [`CoreError::NoSetsLogged`] when `history` is empty.
pub fn next_set(
    scheme: &SetScheme,
    base_weight: Decimal,
    history: &[LoggedSetView],
    rounding: &Rounding,
) -> Result<NextSetResult, CoreError> {
    if !scheme.is_variable() {
        return Err(CoreError::UnsupportedScheme(scheme.kind().to_string()));
    }

    let last = history
        .iter()
        .max_by_key(|s| s.set_number)
        .ok_or(CoreError::NoSetsLogged)?;
    let total_reps = history
        .iter()
        .fold(0i32, |acc, s| acc.saturating_add(s.reps_performed));
    let sets_completed = i32::try_from(history.len()).unwrap_or(i32::MAX);
    let next_number = last.set_number.saturating_add(1);

    let complete = |reason| NextSetResult {
        is_complete: true,
        termination_reason: Some(reason),
        next_set: None,
        total_reps_completed: total_reps,
        sets_completed,
    };
    let proposed = |set| NextSetResult {
        is_complete: false,
        termination_reason: None,
        next_set: Some(set),
        total_reps_completed: total_reps,
        sets_completed,
    };

    match scheme {
        SetScheme::Mrs(s) => {
            if total_reps >= s.target_total_reps {
                return Ok(complete(TerminationReason::TargetReached));
            }
            if next_number > s.max_sets {
                return Ok(complete(TerminationReason::MaxSetsReached));
            }
            let remaining = s.target_total_reps - total_reps;
            let sets_left = s.max_sets - next_number + 1;
            let target_reps = s.min_reps_per_set.max(div_ceil(remaining, sets_left));
            Ok(proposed(GeneratedSet {
                set_number: next_number,
                weight: base_weight,
                target_reps,
                is_work_set: true,
                is_amrap: true,
                target_rpe: None,
            }))
        }
        SetScheme::FatigueDrop(s) => {
            if last.rpe.is_some_and(|rpe| rpe >= s.stop_rpe) {
                return Ok(complete(TerminationReason::FatigueThresholdReached));
            }
            if next_number > s.max_sets {
                return Ok(complete(TerminationReason::MaxSetsReached));
            }
            let raw = last.weight * (Decimal::ONE_HUNDRED - s.drop_percent) / Decimal::ONE_HUNDRED;
            Ok(proposed(GeneratedSet {
                set_number: next_number,
                weight: rounding.apply(raw)?,
                target_reps: s.target_reps,
                is_work_set: true,
                is_amrap: false,
                target_rpe: Some(s.stop_rpe),
            }))
        }
        SetScheme::Fixed(_) | SetScheme::Ramp(_) => {
            Err(CoreError::UnsupportedScheme(scheme.kind().to_string()))
        }
    }
}
