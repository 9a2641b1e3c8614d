//! Weight rounding to plate-loadable increments.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Increment applied to new strategies created without one.
pub const DEFAULT_ROUNDING_INCREMENT: Decimal = Decimal::from_parts(25, 0, 0, false, 1);

/// Output precision used at resolution time when a strategy has no increment.
pub const DEFAULT_PRECISION: Decimal = Decimal::from_parts(25, 0, 0, false, 2);

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Which way to snap a raw weight onto the increment grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundingDirection {
    #[default]
    Nearest,
    Up,
    Down,
}

/// Rounding settings carried by a load strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rounding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub increment: Option<Decimal>,
    #[serde(default)]
    pub direction: RoundingDirection,
}

impl Rounding {
    pub fn new(increment: Option<Decimal>, direction: RoundingDirection) -> Self {
        Self {
            increment,
            direction,
        }
    }

    /// Round `raw` according to these settings.
    pub fn apply(&self, raw: Decimal) -> Result<Decimal, CoreError> {
        round_weight(raw, self.increment, self.direction)
    }
}

// ---------------------------------------------------------------------------
// Rounding
// ---------------------------------------------------------------------------

/// Validate a rounding increment supplied at creation time.
pub fn validate_increment(increment: Decimal) -> Result<(), CoreError> {
    if increment <= Decimal::ZERO {
        return Err(CoreError::Validation(format!(
            "rounding increment must be greater than zero, got {increment}"
        )));
    }
    Ok(())
}

/// Snap `raw` onto a multiple of `increment`.
///
/// `NEAREST` rounds the quotient `raw / increment` half-up. With no increment
/// the result is snapped to the nearest [`DEFAULT_PRECISION`] in the requested
/// direction.
pub fn round_weight(
    raw: Decimal,
    increment: Option<Decimal>,
    direction: RoundingDirection,
) -> Result<Decimal, CoreError> {
    let increment = increment.unwrap_or(DEFAULT_PRECISION);
    validate_increment(increment)?;

    let quotient = raw / increment;
    let steps = match direction {
        RoundingDirection::Nearest => {
            quotient.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        }
        RoundingDirection::Up => quotient.ceil(),
        RoundingDirection::Down => quotient.floor(),
    };

    Ok((steps * increment).normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn default_constants() {
        assert_eq!(DEFAULT_ROUNDING_INCREMENT, dec!(2.5));
        assert_eq!(DEFAULT_PRECISION, dec!(0.25));
    }

    #[test]
    fn nearest_rounds_half_up() {
        // 251.25 / 2.5 = 100.5 -> 101
        assert_eq!(
            round_weight(dec!(251.25), Some(dec!(2.5)), RoundingDirection::Nearest).unwrap(),
            dec!(252.5)
        );
        assert_eq!(
            round_weight(dec!(251.2), Some(dec!(2.5)), RoundingDirection::Nearest).unwrap(),
            dec!(250)
        );
    }

    #[test]
    fn up_and_down() {
        assert_eq!(
            round_weight(dec!(341), Some(dec!(5)), RoundingDirection::Up).unwrap(),
            dec!(345)
        );
        assert_eq!(
            round_weight(dec!(344.9), Some(dec!(5)), RoundingDirection::Down).unwrap(),
            dec!(340)
        );
    }

    #[test]
    fn exact_multiples_unchanged_in_every_direction() {
        for direction in [
            RoundingDirection::Nearest,
            RoundingDirection::Up,
            RoundingDirection::Down,
        ] {
            assert_eq!(
                round_weight(dec!(340), Some(dec!(5)), direction).unwrap(),
                dec!(340)
            );
        }
    }

    #[test]
    fn unset_increment_uses_quarter_precision() {
        assert_eq!(
            round_weight(dec!(101.13), None, RoundingDirection::Nearest).unwrap(),
            dec!(101.25)
        );
        assert_eq!(
            round_weight(dec!(101.1), None, RoundingDirection::Nearest).unwrap(),
            dec!(101)
        );
    }

    #[test]
    fn result_is_multiple_of_increment() {
        let increments = [dec!(1), dec!(2.5), dec!(5), dec!(1.25)];
        let raws = [dec!(99.99), dec!(137.3), dec!(212.5), dec!(0.6), dec!(455.55)];
        for inc in increments {
            for raw in raws {
                let rounded = round_weight(raw, Some(inc), RoundingDirection::Nearest).unwrap();
                assert_eq!(rounded % inc, Decimal::ZERO, "{raw} rounded by {inc}");
            }
        }
    }

    #[test]
    fn nearest_is_idempotent() {
        let once = round_weight(dec!(287.4), Some(dec!(2.5)), RoundingDirection::Nearest).unwrap();
        let twice = round_weight(once, Some(dec!(2.5)), RoundingDirection::Nearest).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn zero_or_negative_increment_rejected() {
        assert!(round_weight(dec!(100), Some(dec!(0)), RoundingDirection::Nearest).is_err());
        assert!(round_weight(dec!(100), Some(dec!(-2.5)), RoundingDirection::Up).is_err());
    }
}
