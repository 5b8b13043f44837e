//! Principals and their role sets
//!
//! A [`Principal`] is the authenticated actor behind a request. Principals are
//! usually deserialized straight from the host's user document, so role data
//! is parsed leniently: anything that is not a list of known role names is
//! dropped rather than rejected.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::HashSet;

use crate::id::{deserialize_id, deserialize_optional_id};
use crate::role::Role;

/// Set of roles held by a principal.
///
/// Membership only; order and duplicates in the source data are irrelevant.
///
/// # Examples
///
/// ```
/// use mediahub_roles::{Role, RoleSet};
/// use serde_json::json;
///
/// let roles = RoleSet::from_value(&json!(["creator", "CREATOR", "ghost"]));
/// assert_eq!(roles.len(), 1);
/// assert!(roles.contains(Role::Creator));
///
/// // Wrong shape fails closed
/// assert!(RoleSet::from_value(&json!("admin")).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoleSet {
    roles: HashSet<Role>,
}

impl RoleSet {
    /// Create an empty role set.
    pub fn new() -> Self {
        Self {
            roles: HashSet::new(),
        }
    }

    /// Build a role set from raw JSON.
    ///
    /// Only an array is accepted. Non-string entries and unknown role names
    /// are skipped; any other shape yields an empty set.
    pub fn from_value(value: &Value) -> Self {
        let Value::Array(items) = value else {
            if !value.is_null() {
                tracing::debug!(shape = %value_kind(value), "Ignoring malformed role list");
            }
            return Self::new();
        };

        let mut set = Self::new();
        for item in items {
            match item.as_str().map(|s| (s, Role::parse(s))) {
                Some((_, Some(role))) => {
                    set.insert(role);
                }
                Some((raw, None)) => {
                    tracing::debug!(role = %raw, "Ignoring unrecognized role");
                }
                None => {
                    tracing::debug!(shape = %value_kind(item), "Ignoring non-string role entry");
                }
            }
        }
        set
    }

    /// Add a role. Returns `false` if it was already present.
    pub fn insert(&mut self, role: Role) -> bool {
        self.roles.insert(role)
    }

    /// Check membership.
    pub fn contains(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }

    /// Check whether any of `roles` is in the set.
    pub fn contains_any(&self, roles: &[Role]) -> bool {
        roles.iter().any(|role| self.contains(*role))
    }

    /// Iterate over the roles in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = Role> + '_ {
        self.roles.iter().copied()
    }

    /// Number of distinct roles.
    pub fn len(&self) -> usize {
        self.roles.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

impl FromIterator<Role> for RoleSet {
    fn from_iter<T: IntoIterator<Item = Role>>(iter: T) -> Self {
        Self {
            roles: iter.into_iter().collect(),
        }
    }
}

impl Serialize for RoleSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        // Stable output: hierarchy order.
        let ordered: Vec<&'static str> = Role::all()
            .into_iter()
            .filter(|role| self.contains(*role))
            .map(|role| role.as_str())
            .collect();
        ordered.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RoleSet {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.map(|v| Self::from_value(&v)).unwrap_or_default())
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// The authenticated actor for a request.
///
/// Anonymous requests are modelled as `Option<Principal>::None` by callers;
/// a `Principal` value always has an id.
///
/// # Examples
///
/// ```
/// use mediahub_roles::{Principal, Role};
/// use serde_json::json;
///
/// let user: Principal = serde_json::from_value(json!({
///     "id": 17,
///     "roles": ["staff"],
///     "profile": {"id": "p-9", "handle": "dj"}
/// })).unwrap();
///
/// assert_eq!(user.id, "17");
/// assert_eq!(user.profile_id.as_deref(), Some("p-9"));
/// assert!(user.has_role(Role::Staff));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Principal {
    /// Stable user id
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,

    /// Linked creator/artist profile, used by profile-owned collections
    #[serde(
        default,
        alias = "profile",
        deserialize_with = "deserialize_optional_id",
        skip_serializing_if = "Option::is_none"
    )]
    pub profile_id: Option<String>,

    /// Assigned roles
    #[serde(default)]
    pub roles: RoleSet,
}

impl Principal {
    /// Creates a principal with no roles.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            profile_id: None,
            roles: RoleSet::new(),
        }
    }

    /// Add a role.
    pub fn with_role(mut self, role: Role) -> Self {
        self.roles.insert(role);
        self
    }

    /// Replace the role set.
    pub fn with_roles<I>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = Role>,
    {
        self.roles = roles.into_iter().collect();
        self
    }

    /// Set the linked profile id.
    pub fn with_profile_id(mut self, profile_id: impl Into<String>) -> Self {
        self.profile_id = Some(profile_id.into());
        self
    }

    /// Check for an exact role (no hierarchy).
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_role_set_ignores_duplicates_and_order() {
        let a = RoleSet::from_value(&json!(["free", "creator", "free"]));
        let b = RoleSet::from_value(&json!(["creator", "free"]));
        assert_eq!(a, b);
        assert_eq!(a.len(), 2);
    }

    #[test]
    fn test_role_set_malformed_shapes_are_empty() {
        assert!(RoleSet::from_value(&json!(null)).is_empty());
        assert!(RoleSet::from_value(&json!("admin")).is_empty());
        assert!(RoleSet::from_value(&json!({"admin": true})).is_empty());
        assert!(RoleSet::from_value(&json!([1, null, {"role": "admin"}])).is_empty());
    }

    #[test]
    fn test_principal_missing_roles_deserializes_empty() {
        let p: Principal = serde_json::from_value(json!({"id": "u1"})).unwrap();
        assert!(p.roles.is_empty());
        assert!(p.profile_id.is_none());

        let p: Principal = serde_json::from_value(json!({"id": "u1", "roles": null})).unwrap();
        assert!(p.roles.is_empty());

        let p: Principal = serde_json::from_value(json!({"id": "u1", "roles": "admin"})).unwrap();
        assert!(!p.has_role(Role::Admin));
    }

    #[test]
    fn test_principal_requires_an_id() {
        assert!(serde_json::from_value::<Principal>(json!({"roles": ["admin"]})).is_err());
        assert!(serde_json::from_value::<Principal>(json!({"id": ""})).is_err());
    }

    #[test]
    fn test_principal_profile_shapes() {
        let raw: Principal = serde_json::from_value(json!({"id": "u1", "profile": "p1"})).unwrap();
        let expanded: Principal =
            serde_json::from_value(json!({"id": "u1", "profile": {"id": "p1"}})).unwrap();
        let field: Principal =
            serde_json::from_value(json!({"id": "u1", "profile_id": "p1"})).unwrap();

        assert_eq!(raw.profile_id.as_deref(), Some("p1"));
        assert_eq!(raw, expanded);
        assert_eq!(raw, field);
    }

    #[test]
    fn test_has_role_is_exact() {
        let creator = Principal::new("c").with_roles([Role::Creator, Role::Free]);
        assert!(creator.has_role(Role::Creator));
        assert!(creator.has_role(Role::Free));
        assert!(!creator.has_role(Role::Staff));

        let admin = Principal::new("a").with_role(Role::Admin);
        assert!(!admin.has_role(Role::Staff));
    }

    #[test]
    fn test_role_set_serializes_in_hierarchy_order() {
        let set: RoleSet = [Role::Free, Role::Admin].into_iter().collect();
        assert_eq!(serde_json::to_value(&set).unwrap(), json!(["admin", "free"]));
    }
}
