//! Workout aggregate and program-day selection.

use serde::Serialize;

use crate::error::CoreError;
use crate::prescription::ResolvedPrescription;
use crate::types::{Date, DbId};

/// One day slot within a program week, ordered by `position`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaySlot {
    pub day_id: DbId,
    pub slug: String,
    pub name: String,
    pub position: i32,
}

/// Everything a user must perform on one program day.
#[derive(Debug, Clone, Serialize)]
pub struct Workout {
    pub user_id: DbId,
    pub program_id: DbId,
    pub cycle_iteration: i32,
    pub week_number: i32,
    pub day_slug: String,
    pub day_name: String,
    pub date: Date,
    pub exercises: Vec<ResolvedPrescription>,
}

/// Pick the day to resolve from a week's ordered slots.
///
/// An explicit `slug` wins; otherwise `day_index` (0-based) selects by
/// position, and an untracked index means the first day of the week.
pub fn select_day<'a>(
    days: &'a [DaySlot],
    day_index: Option<i32>,
    slug: Option<&str>,
) -> Result<&'a DaySlot, CoreError> {
    if let Some(slug) = slug {
        return days
            .iter()
            .find(|d| d.slug == slug)
            .ok_or_else(|| CoreError::DayNotFound {
                day: slug.to_string(),
            });
    }

    let index = day_index.unwrap_or(0);
    usize::try_from(index)
        .ok()
        .and_then(|i| days.get(i))
        .ok_or_else(|| CoreError::DayNotFound {
            day: format!("index {index}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use uuid::Uuid;

    fn week() -> Vec<DaySlot> {
        ["press-day", "squat-day", "deadlift-day"]
            .iter()
            .zip(0..)
            .map(|(slug, position)| DaySlot {
                day_id: Uuid::new_v4(),
                slug: slug.to_string(),
                name: slug.replace('-', " "),
                position,
            })
            .collect()
    }

    #[test]
    fn slug_takes_precedence() {
        let days = week();
        let day = select_day(&days, Some(0), Some("deadlift-day")).unwrap();
        assert_eq!(day.slug, "deadlift-day");
    }

    #[test]
    fn untracked_index_is_first_day() {
        let days = week();
        assert_eq!(select_day(&days, None, None).unwrap().slug, "press-day");
        assert_eq!(select_day(&days, Some(1), None).unwrap().slug, "squat-day");
    }

    #[test]
    fn missing_day_errors() {
        let days = week();
        assert_matches!(
            select_day(&days, None, Some("bench-day")),
            Err(CoreError::DayNotFound { .. })
        );
        assert_matches!(
            select_day(&days, Some(7), None),
            Err(CoreError::DayNotFound { .. })
        );
        assert_matches!(select_day(&[], None, None), Err(CoreError::DayNotFound { .. }));
    }
}
