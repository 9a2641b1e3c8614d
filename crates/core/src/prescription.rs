//! Prescription resolution: load strategy + set scheme -> concrete sets.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::load_strategy::{resolve_load, validate_strategy, LoadResolution, LoadStrategy, LookupValues};
use crate::set_scheme::{generate_sets, validate_scheme, GeneratedSet, GenerationContext, SetScheme};
use crate::types::DbId;

/// Maximum rest period a prescription may declare (one hour).
pub const MAX_REST_SECONDS: i32 = 3600;

/// Lift metadata attached to resolved output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LiftInfo {
    pub id: DbId,
    pub name: String,
    pub slug: String,
}

/// Declarative definition of one exercise slot on a day.
#[derive(Debug, Clone, PartialEq)]
pub struct Prescription {
    pub id: DbId,
    pub lift_id: DbId,
    pub load_strategy: LoadStrategy,
    pub set_scheme: SetScheme,
    pub sort_order: i32,
    pub notes: Option<String>,
    pub rest_seconds: Option<i32>,
}

/// Concrete weights and reps for one prescription, computed per request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedPrescription {
    pub prescription_id: DbId,
    pub lift: LiftInfo,
    pub load_strategy: &'static str,
    pub set_scheme: &'static str,
    pub is_variable: bool,
    pub load: LoadResolution,
    pub sets: Vec<GeneratedSet>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rest_seconds: Option<i32>,
}

/// Validate a prescription's strategy, scheme, and rest period.
pub fn validate_prescription(
    strategy: &LoadStrategy,
    scheme: &SetScheme,
    rest_seconds: Option<i32>,
) -> Result<(), CoreError> {
    validate_strategy(strategy)?;
    validate_scheme(scheme)?;
    if let Some(rest) = rest_seconds {
        if !(0..=MAX_REST_SECONDS).contains(&rest) {
            return Err(CoreError::Validation(format!(
                "rest_seconds must be between 0 and {MAX_REST_SECONDS}, got {rest}"
            )));
        }
    }
    Ok(())
}

/// Resolve a prescription given the user's max for its reference type.
pub fn resolve_prescription(
    prescription: &Prescription,
    lift: LiftInfo,
    max_value: Decimal,
    lookups: &LookupValues,
) -> Result<ResolvedPrescription, CoreError> {
    let load = resolve_load(&prescription.load_strategy, max_value, lookups)?;
    let ctx = GenerationContext {
        base_weight: load.weight,
        max_basis: max_value,
        rounding: prescription.load_strategy.rounding(),
        reps_override: load.reps_override,
    };
    let sets = generate_sets(&prescription.set_scheme, &ctx)?;

    Ok(ResolvedPrescription {
        prescription_id: prescription.id,
        lift,
        load_strategy: prescription.load_strategy.kind(),
        set_scheme: prescription.set_scheme.kind(),
        is_variable: prescription.set_scheme.is_variable(),
        load,
        sets,
        notes: prescription.notes.clone(),
        rest_seconds: prescription.rest_seconds,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lift_max::MaxType;
    use crate::load_strategy::PercentOf;
    use crate::rounding::RoundingDirection;
    use crate::set_scheme::{FixedScheme, RampScheme, RampStep};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn squat() -> LiftInfo {
        LiftInfo {
            id: Uuid::nil(),
            name: "Back Squat".to_string(),
            slug: "back-squat".to_string(),
        }
    }

    fn prescription(scheme: SetScheme) -> Prescription {
        Prescription {
            id: Uuid::nil(),
            lift_id: Uuid::nil(),
            load_strategy: LoadStrategy::PercentOf(PercentOf {
                reference_type: MaxType::TrainingMax,
                percentage: dec!(85),
                rounding_increment: Some(dec!(5)),
                rounding_direction: RoundingDirection::Nearest,
            }),
            set_scheme: scheme,
            sort_order: 0,
            notes: Some("belt on top set".to_string()),
            rest_seconds: Some(180),
        }
    }

    #[test]
    fn fixed_prescription_resolves() {
        let p = prescription(SetScheme::Fixed(FixedScheme { sets: 5, reps: 3 }));
        let resolved =
            resolve_prescription(&p, squat(), dec!(400), &LookupValues::default()).unwrap();
        assert_eq!(resolved.sets.len(), 5);
        assert!(resolved.sets.iter().all(|s| s.weight == dec!(340)));
        assert_eq!(resolved.load.weight, dec!(340));
        assert_eq!(resolved.set_scheme, "FIXED");
        assert_eq!(resolved.rest_seconds, Some(180));
        assert_eq!(resolved.notes.as_deref(), Some("belt on top set"));
    }

    #[test]
    fn ramp_steps_use_max_not_base_weight() {
        let p = prescription(SetScheme::Ramp(RampScheme {
            steps: vec![RampStep {
                percentage: dec!(50),
                reps: 5,
            }],
            work_set_threshold: dec!(70),
        }));
        let resolved =
            resolve_prescription(&p, squat(), dec!(500), &LookupValues::default()).unwrap();
        assert_eq!(resolved.sets[0].weight, dec!(250));
        assert!(!resolved.sets[0].is_work_set);
    }

    #[test]
    fn rest_seconds_bounds() {
        let p = prescription(SetScheme::Fixed(FixedScheme { sets: 1, reps: 1 }));
        assert!(validate_prescription(&p.load_strategy, &p.set_scheme, Some(90)).is_ok());
        assert!(validate_prescription(&p.load_strategy, &p.set_scheme, Some(-1)).is_err());
        assert!(validate_prescription(&p.load_strategy, &p.set_scheme, Some(7200)).is_err());
    }
}
