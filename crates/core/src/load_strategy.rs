//! Load strategies: turning a max (and optional lookup tables) into a weight.
//!
//! Every strategy variant resolves against a stored max. The variant declares
//! which max type it needs through [`LoadStrategy::reference_type`], and
//! lookup-driven variants additionally declare their tables through
//! [`LoadStrategy::lookup_refs`], so callers know exactly what to fetch before
//! calling [`resolve_load`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::lift_max::MaxType;
use crate::rounding::{validate_increment, Rounding, RoundingDirection};
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Lowest percentage a strategy may prescribe.
pub const MIN_PERCENTAGE: Decimal = Decimal::ONE;

/// Highest percentage a strategy may prescribe.
pub const MAX_PERCENTAGE: Decimal = Decimal::ONE_HUNDRED;

// ---------------------------------------------------------------------------
// Strategy variants
// ---------------------------------------------------------------------------

/// A fixed percentage of one of the user's maxes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PercentOf {
    pub reference_type: MaxType,
    pub percentage: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounding_increment: Option<Decimal>,
    #[serde(default)]
    pub rounding_direction: RoundingDirection,
}

/// Percentage (and optionally reps) taken from the program's weekly and/or
/// daily lookup tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupBased {
    #[serde(default = "default_lookup_reference")]
    pub reference_type: MaxType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weekly_lookup_id: Option<DbId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_lookup_id: Option<DbId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rounding_increment: Option<Decimal>,
    #[serde(default)]
    pub rounding_direction: RoundingDirection,
}

fn default_lookup_reference() -> MaxType {
    MaxType::TrainingMax
}

/// How a prescription computes its working weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoadStrategy {
    PercentOf(PercentOf),
    LookupBased(LookupBased),
}

/// Lookup tables a strategy wants consulted. `None` means "use the program's".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LookupRefs {
    pub weekly_lookup_id: Option<DbId>,
    pub daily_lookup_id: Option<DbId>,
}

impl LoadStrategy {
    /// Strategy kind as a stable string (for logs and responses).
    pub fn kind(&self) -> &'static str {
        match self {
            Self::PercentOf(_) => "PERCENT_OF",
            Self::LookupBased(_) => "LOOKUP_BASED",
        }
    }

    /// The max type this strategy resolves against.
    pub fn reference_type(&self) -> MaxType {
        match self {
            Self::PercentOf(s) => s.reference_type,
            Self::LookupBased(s) => s.reference_type,
        }
    }

    /// Lookup tables this strategy reads, if it is lookup-driven.
    pub fn lookup_refs(&self) -> Option<LookupRefs> {
        match self {
            Self::PercentOf(_) => None,
            Self::LookupBased(s) => Some(LookupRefs {
                weekly_lookup_id: s.weekly_lookup_id,
                daily_lookup_id: s.daily_lookup_id,
            }),
        }
    }

    pub fn rounding(&self) -> Rounding {
        match self {
            Self::PercentOf(s) => Rounding::new(s.rounding_increment, s.rounding_direction),
            Self::LookupBased(s) => Rounding::new(s.rounding_increment, s.rounding_direction),
        }
    }

    /// Fill in an omitted rounding increment. Used when strategies are created.
    pub fn with_default_increment(mut self, increment: Decimal) -> Self {
        match &mut self {
            Self::PercentOf(s) => {
                s.rounding_increment.get_or_insert(increment);
            }
            Self::LookupBased(s) => {
                s.rounding_increment.get_or_insert(increment);
            }
        }
        self
    }
}

// ---------------------------------------------------------------------------
// Lookup values
// ---------------------------------------------------------------------------

/// One row of a weekly or daily lookup table, already selected by week/day.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LookupEntry {
    pub percentage: Option<Decimal>,
    pub reps: Option<i32>,
    /// Multiplier expressed as a percentage; 100 leaves the percentage unchanged.
    pub percentage_modifier: Option<Decimal>,
}

/// The weekly and daily entries that apply to one (week, day) position.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LookupValues {
    pub weekly: Option<LookupEntry>,
    pub daily: Option<LookupEntry>,
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Output of a successful load-strategy resolution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LoadResolution {
    pub weight: Decimal,
    pub percentage: Decimal,
    pub max_type: MaxType,
    pub max_value: Decimal,
    /// Reps dictated by a lookup table, overriding a fixed scheme's reps.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps_override: Option<i32>,
}

/// Validate a strategy at creation time.
pub fn validate_strategy(strategy: &LoadStrategy) -> Result<(), CoreError> {
    match strategy {
        LoadStrategy::PercentOf(s) => {
            validate_percentage(s.percentage)?;
            if let Some(inc) = s.rounding_increment {
                validate_increment(inc)?;
            }
        }
        LoadStrategy::LookupBased(s) => {
            if let Some(inc) = s.rounding_increment {
                validate_increment(inc)?;
            }
        }
    }
    Ok(())
}

/// Validate that a percentage lies within 1-100 inclusive.
pub fn validate_percentage(percentage: Decimal) -> Result<(), CoreError> {
    if percentage < MIN_PERCENTAGE || percentage > MAX_PERCENTAGE {
        return Err(CoreError::Validation(format!(
            "percentage must be between {MIN_PERCENTAGE} and {MAX_PERCENTAGE}, got {percentage}"
        )));
    }
    Ok(())
}

/// Resolve a strategy into a concrete weight.
///
/// `max_value` is the user's current max of [`LoadStrategy::reference_type`].
/// Percentages are not range-checked here; that happens at creation.
pub fn resolve_load(
    strategy: &LoadStrategy,
    max_value: Decimal,
    lookups: &LookupValues,
) -> Result<LoadResolution, CoreError> {
    let (percentage, reps_override) = match strategy {
        LoadStrategy::PercentOf(s) => (s.percentage, None),
        LoadStrategy::LookupBased(_) => resolve_lookup_percentage(lookups)?,
    };

    let raw = max_value * percentage / Decimal::ONE_HUNDRED;
    let weight = strategy.rounding().apply(raw)?;

    Ok(LoadResolution {
        weight,
        percentage: percentage.normalize(),
        max_type: strategy.reference_type(),
        max_value,
        reps_override,
    })
}

/// Combine weekly and daily lookup entries into a percentage and optional reps.
///
/// The daily entry's values override the weekly ones; every present
/// `percentage_modifier` is applied multiplicatively.
fn resolve_lookup_percentage(lookups: &LookupValues) -> Result<(Decimal, Option<i32>), CoreError> {
    let weekly = lookups.weekly.unwrap_or_default();
    let daily = lookups.daily.unwrap_or_default();

    let mut percentage = daily.percentage.or(weekly.percentage).ok_or_else(|| {
        CoreError::Validation("lookup tables have no percentage for this week and day".to_string())
    })?;

    for modifier in [weekly.percentage_modifier, daily.percentage_modifier]
        .into_iter()
        .flatten()
    {
        percentage = percentage * modifier / Decimal::ONE_HUNDRED;
    }

    Ok((percentage, daily.reps.or(weekly.reps)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rust_decimal_macros::dec;

    fn percent_of(pct: Decimal, increment: Option<Decimal>) -> LoadStrategy {
        LoadStrategy::PercentOf(PercentOf {
            reference_type: MaxType::TrainingMax,
            percentage: pct,
            rounding_increment: increment,
            rounding_direction: RoundingDirection::Nearest,
        })
    }

    fn lookup_based() -> LoadStrategy {
        LoadStrategy::LookupBased(LookupBased {
            reference_type: MaxType::TrainingMax,
            weekly_lookup_id: None,
            daily_lookup_id: None,
            rounding_increment: Some(dec!(5)),
            rounding_direction: RoundingDirection::Nearest,
        })
    }

    #[test]
    fn percent_of_training_max() {
        let res = resolve_load(&percent_of(dec!(85), Some(dec!(5))), dec!(400), &LookupValues::default())
            .unwrap();
        assert_eq!(res.weight, dec!(340));
        assert_eq!(res.max_type, MaxType::TrainingMax);
        assert_eq!(res.reps_override, None);
    }

    #[test]
    fn percent_of_without_increment_uses_quarter_precision() {
        // 315 * 0.67 = 211.05 -> 211.0
        let res = resolve_load(&percent_of(dec!(67), None), dec!(315), &LookupValues::default())
            .unwrap();
        assert_eq!(res.weight, dec!(211));
    }

    #[test]
    fn percent_of_round_up() {
        let strategy = LoadStrategy::PercentOf(PercentOf {
            reference_type: MaxType::OneRm,
            percentage: dec!(72.5),
            rounding_increment: Some(dec!(5)),
            rounding_direction: RoundingDirection::Up,
        });
        // 405 * 0.725 = 293.625 -> 295
        let res = resolve_load(&strategy, dec!(405), &LookupValues::default()).unwrap();
        assert_eq!(res.weight, dec!(295));
    }

    #[test]
    fn lookup_uses_weekly_entry() {
        let lookups = LookupValues {
            weekly: Some(LookupEntry {
                percentage: Some(dec!(80)),
                reps: Some(5),
                percentage_modifier: None,
            }),
            daily: None,
        };
        let res = resolve_load(&lookup_based(), dec!(300), &lookups).unwrap();
        assert_eq!(res.weight, dec!(240));
        assert_eq!(res.reps_override, Some(5));
    }

    #[test]
    fn daily_entry_overrides_weekly() {
        let lookups = LookupValues {
            weekly: Some(LookupEntry {
                percentage: Some(dec!(80)),
                reps: Some(5),
                percentage_modifier: None,
            }),
            daily: Some(LookupEntry {
                percentage: Some(dec!(70)),
                reps: None,
                percentage_modifier: None,
            }),
        };
        let res = resolve_load(&lookup_based(), dec!(300), &lookups).unwrap();
        assert_eq!(res.weight, dec!(210));
        // Daily entry has no reps, so the weekly reps survive.
        assert_eq!(res.reps_override, Some(5));
    }

    #[test]
    fn modifiers_apply_multiplicatively() {
        let lookups = LookupValues {
            weekly: Some(LookupEntry {
                percentage: Some(dec!(80)),
                reps: None,
                percentage_modifier: Some(dec!(90)),
            }),
            daily: Some(LookupEntry {
                percentage: None,
                reps: None,
                percentage_modifier: Some(dec!(50)),
            }),
        };
        // 80 * 0.9 * 0.5 = 36% of 500 = 180
        let res = resolve_load(&lookup_based(), dec!(500), &lookups).unwrap();
        assert_eq!(res.percentage, dec!(36));
        assert_eq!(res.weight, dec!(180));
    }

    #[test]
    fn lookup_without_percentage_is_validation_error() {
        let res = resolve_load(&lookup_based(), dec!(500), &LookupValues::default());
        assert_matches!(res, Err(CoreError::Validation(_)));
    }

    #[test]
    fn percentage_range_validated_at_creation() {
        assert!(validate_strategy(&percent_of(dec!(0.5), None)).is_err());
        assert!(validate_strategy(&percent_of(dec!(101), None)).is_err());
        assert!(validate_strategy(&percent_of(dec!(1), None)).is_ok());
        assert!(validate_strategy(&percent_of(dec!(100), Some(dec!(2.5)))).is_ok());
        assert!(validate_strategy(&percent_of(dec!(75), Some(dec!(0)))).is_err());
    }

    #[test]
    fn default_increment_only_fills_missing() {
        let filled = percent_of(dec!(75), None).with_default_increment(dec!(2.5));
        assert_eq!(filled.rounding().increment, Some(dec!(2.5)));

        let kept = percent_of(dec!(75), Some(dec!(5))).with_default_increment(dec!(2.5));
        assert_eq!(kept.rounding().increment, Some(dec!(5)));
    }

    #[test]
    fn strategy_json_shape() {
        let json = serde_json::json!({
            "type": "PERCENT_OF",
            "reference_type": "TRAINING_MAX",
            "percentage": "85",
            "rounding_increment": "5",
            "rounding_direction": "UP"
        });
        let strategy: LoadStrategy = serde_json::from_value(json).unwrap();
        assert_eq!(strategy.kind(), "PERCENT_OF");
        assert_eq!(strategy.rounding().direction, RoundingDirection::Up);
        assert!(strategy.lookup_refs().is_none());

        let lookup: LoadStrategy = serde_json::from_value(serde_json::json!({
            "type": "LOOKUP_BASED"
        }))
        .unwrap();
        assert_eq!(lookup.reference_type(), MaxType::TrainingMax);
        assert_eq!(lookup.lookup_refs(), Some(LookupRefs::default()));
    }
}
