//! Shared query parameter types for API handlers.

use liftcycle_core::types::Date;
use serde::Deserialize;

/// Optional `?date=` for endpoints that resolve against maxes. Defaults to today.
#[derive(Debug, Deserialize)]
pub struct DateParams {
    pub date: Option<Date>,
}

/// Today's date in UTC.
pub fn today() -> Date {
    chrono::Utc::now().date_naive()
}
