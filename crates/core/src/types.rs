/// All database primary keys are PostgreSQL UUIDs.
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar date used for max effective dates and workout dates.
pub type Date = chrono::NaiveDate;

/// Exact decimal used for every weight, max value, and percentage.
pub type Weight = rust_decimal::Decimal;
