//! Session role.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing an unknown role.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid role: {0} (expected User or Admin)")]
pub struct ParseRoleError(pub String);

/// Role asserted by the server at login and stored alongside the token.
///
/// The role is not bound to the token cryptographically; it is whatever the
/// login response said. Only meaningful while a token is present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Role {
    /// Regular customer. Also the fallback for unset or unknown roles.
    #[default]
    User,
    /// Shop administrator: manages recipes, brew methods, ingredients and order statuses.
    Admin,
}

impl Role {
    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Admin => "Admin",
        }
    }

    /// Whether this is the admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Parse a stored role, falling back to [`Role::User`] for anything unrecognized.
    #[must_use]
    pub fn from_stored(value: Option<&str>) -> Self {
        value.and_then(|v| v.parse().ok()).unwrap_or_default()
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "User" | "user" => Ok(Self::User),
            "Admin" | "admin" => Ok(Self::Admin),
            _ => Err(ParseRoleError(s.to_owned())),
        }
    }
}
