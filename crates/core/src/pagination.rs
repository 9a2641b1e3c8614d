//! Limit/offset clamping shared by paginated list endpoints.

/// Default page size for progression history.
pub const DEFAULT_HISTORY_LIMIT: i64 = 50;

/// Upper bound on any page size.
pub const MAX_PAGE_LIMIT: i64 = 200;

/// Clamp a user-provided limit into `1..=max`, defaulting to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
