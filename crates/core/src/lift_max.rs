//! Strength-max types and selection rules.
//!
//! A user may hold many max records per lift and type; exactly one of them is
//! "current" for a given as-of date. The database query in the `db` crate and
//! [`select_current`] below implement the same ordering.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{Date, Timestamp};

/// Kind of stored max a strategy or progression refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MaxType {
    OneRm,
    TrainingMax,
}

/// All valid max type strings.
const VALID_MAX_TYPES: &[&str] = &["ONE_RM", "TRAINING_MAX"];

impl MaxType {
    /// Return the max type as its stored string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneRm => "ONE_RM",
            Self::TrainingMax => "TRAINING_MAX",
        }
    }

    /// Parse a max type from its stored string.
    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            "ONE_RM" => Ok(Self::OneRm),
            "TRAINING_MAX" => Ok(Self::TrainingMax),
            _ => Err(CoreError::Validation(format!(
                "Invalid max type '{s}'. Must be one of: {}",
                VALID_MAX_TYPES.join(", ")
            ))),
        }
    }
}

impl fmt::Display for MaxType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a max value supplied by a user.
pub fn validate_max_value(value: Decimal) -> Result<(), CoreError> {
    if value <= Decimal::ZERO {
        return Err(CoreError::Validation(format!(
            "max value must be greater than zero, got {value}"
        )));
    }
    Ok(())
}

/// Minimal view of a stored max used for current-max selection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaxRecord {
    pub value: Decimal,
    pub effective_date: Date,
    pub created_at: Timestamp,
}

/// Pick the current max as of `as_of`.
///
/// Records effective after `as_of` are ignored. Ties on effective date go to
/// the most recently created record.
pub fn select_current(records: &[MaxRecord], as_of: Date) -> Option<MaxRecord> {
    records
        .iter()
        .filter(|r| r.effective_date <= as_of)
        .max_by(|a, b| {
            a.effective_date
                .cmp(&b.effective_date)
                .then(a.created_at.cmp(&b.created_at))
        })
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{NaiveDate, TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn record(value: Decimal, day: u32, created_secs: i64) -> MaxRecord {
        MaxRecord {
            value,
            effective_date: NaiveDate::from_ymd_opt(2026, 3, day).unwrap(),
            created_at: Utc.timestamp_opt(1_700_000_000 + created_secs, 0).unwrap(),
        }
    }

    #[test]
    fn max_type_round_trips_through_str() {
        for t in [MaxType::OneRm, MaxType::TrainingMax] {
            assert_eq!(MaxType::from_str(t.as_str()).unwrap(), t);
        }
    }

    #[test]
    fn unknown_max_type_rejected() {
        assert_matches!(MaxType::from_str("FIVE_RM"), Err(CoreError::Validation(_)));
    }

    #[test]
    fn non_positive_values_rejected() {
        assert!(validate_max_value(dec!(0)).is_err());
        assert!(validate_max_value(dec!(-5)).is_err());
        assert!(validate_max_value(dec!(0.5)).is_ok());
    }

    #[test]
    fn latest_effective_date_wins() {
        let records = [record(dec!(300), 1, 0), record(dec!(310), 5, 0)];
        let as_of = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        assert_eq!(select_current(&records, as_of).unwrap().value, dec!(310));
    }

    #[test]
    fn future_records_ignored() {
        let records = [record(dec!(300), 1, 0), record(dec!(310), 20, 0)];
        let as_of = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
        assert_eq!(select_current(&records, as_of).unwrap().value, dec!(300));
    }

    #[test]
    fn same_day_tie_goes_to_newest_record() {
        let records = [record(dec!(300), 5, 10), record(dec!(305), 5, 20), record(dec!(295), 5, 5)];
        let as_of = NaiveDate::from_ymd_opt(2026, 3, 5).unwrap();
        assert_eq!(select_current(&records, as_of).unwrap().value, dec!(305));
    }

    #[test]
    fn nothing_before_as_of_yields_none() {
        let records = [record(dec!(300), 20, 0)];
        let as_of = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert!(select_current(&records, as_of).is_none());
    }
}
