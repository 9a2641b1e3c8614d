//! User roles.
//!
//! The string forms must match the CHECK constraint on `users.role`.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_USER: &str = "user";

/// What a caller may do. Admins author programs, prescriptions and
/// progression rules; users train against them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => ROLE_ADMIN,
            Self::User => ROLE_USER,
        }
    }

    pub fn from_str(s: &str) -> Result<Self, CoreError> {
        match s {
            ROLE_ADMIN => Ok(Self::Admin),
            ROLE_USER => Ok(Self::User),
            other => Err(CoreError::Unauthorized(format!("Unknown role '{other}'"))),
        }
    }

    /// Whether the role may create or change shared program content.
    pub fn can_author(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn parses_known_roles() {
        assert_eq!(Role::from_str("admin").unwrap(), Role::Admin);
        assert_eq!(Role::from_str("user").unwrap(), Role::User);
        assert!(Role::Admin.can_author());
        assert!(!Role::User.can_author());
    }

    #[test]
    fn unknown_role_is_unauthorized() {
        assert_matches!(Role::from_str("coach"), Err(CoreError::Unauthorized(_)));
    }
}
