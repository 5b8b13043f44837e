//! Platform roles
//!
//! This module defines the closed set of privilege tiers a MediaHub user
//! can hold. Ordering between roles lives in [`crate::hierarchy`], not here.

use serde::{Deserialize, Serialize};

/// Privilege tier assigned to a principal.
///
/// The set is fixed at compile time. Comparison between roles is done
/// through a [`RoleHierarchy`](crate::RoleHierarchy), so this type
/// deliberately does not implement `Ord`.
///
/// # Permission Model
///
/// - **Admin**: Full control over every collection, including deletes
/// - **Staff**: Editorial and support staff; manage content and users
/// - **Creator**: Artists, hosts and writers publishing their own work
/// - **Free**: Registered listener/reader with no paid entitlements
///
/// # Examples
///
/// ```
/// use mediahub_roles::Role;
///
/// assert_eq!(Role::parse("STAFF"), Some(Role::Staff));
/// assert_eq!(Role::Creator.as_str(), "creator");
/// ```
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Full platform control
    Admin,

    /// Editorial, moderation and support staff
    Staff,

    /// Content creators (artists, show hosts, writers)
    Creator,

    /// Registered user without paid entitlements
    Free,
}

impl Role {
    /// Parse role from string representation.
    ///
    /// # Arguments
    ///
    /// * `s` - String to parse (case-insensitive, surrounding whitespace ignored)
    ///
    /// # Returns
    ///
    /// `Some(Role)` if valid, `None` otherwise
    ///
    /// # Examples
    ///
    /// ```
    /// use mediahub_roles::Role;
    ///
    /// assert_eq!(Role::parse("admin"), Some(Role::Admin));
    /// assert_eq!(Role::parse(" Creator "), Some(Role::Creator));
    /// assert_eq!(Role::parse("superuser"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "staff" => Some(Self::Staff),
            "creator" => Some(Self::Creator),
            "free" => Some(Self::Free),
            _ => None,
        }
    }

    /// Get string representation of the role.
    ///
    /// This is the identifier stored on user documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Staff => "staff",
            Self::Creator => "creator",
            Self::Free => "free",
        }
    }

    /// All roles, most privileged first.
    pub fn all() -> [Self; 4] {
        [Self::Admin, Self::Staff, Self::Creator, Self::Free]
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

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("Staff"), Some(Role::Staff));
        assert_eq!(Role::parse("CREATOR"), Some(Role::Creator));
        assert_eq!(Role::parse("free"), Some(Role::Free));
        assert_eq!(Role::parse(""), None);
        assert_eq!(Role::parse("owner"), None);
    }

    #[test]
    fn test_role_round_trips_through_as_str() {
        for role in Role::all() {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_role_serde_uses_lowercase() {
        let json = serde_json::to_string(&Role::Staff).unwrap();
        assert_eq!(json, "\"staff\"");

        let role: Role = serde_json::from_str("\"creator\"").unwrap();
        assert_eq!(role, Role::Creator);
    }
}
