//! Staff account roles.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Role of a staff account.
///
/// Stored as `TEXT` in the database and rendered in
/// `SCREAMING_SNAKE_CASE` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    /// Full access: staff management, catalog writes, settings.
    Admin,
    /// Checkout terminal and read access.
    #[default]
    Staff,
}

impl UserRole {
    /// Database/wire representation of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Staff => "STAFF",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "STAFF" => Ok(Self::Staff),
            other => Err(ParseRoleError(other.to_owned())),
        }
    }
}

/// Error returned when a role string is not recognised.
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown user role: {0}")]
pub struct ParseRoleError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in [UserRole::Admin, UserRole::Staff] {
            let parsed: UserRole = role.as_str().parse().expect("roundtrip");
            assert_eq!(parsed, role);
        }
    }

    #[test]
    fn test_role_rejects_unknown() {
        assert!("MANAGER".parse::<UserRole>().is_err());
        assert!("admin".parse::<UserRole>().is_err());
    }
}
