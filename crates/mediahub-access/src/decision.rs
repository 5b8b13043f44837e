//! # Access decisions
//!
//! What a rule hands back to the host: allow, deny, or a row filter.

use serde::{Serialize, Serializer};

use crate::filter::Where;

/// Outcome of a document-level access rule.
///
/// `Filter` is only meaningful where the host can turn it into a query
/// constraint (collection read/update/delete). Field-level access never sees
/// it; see [`FieldAccess`](crate::FieldAccess).
///
/// Serializes to the host's wire shape: `true`, `false`, or the where-clause.
///
/// # Example
///
/// ```
/// use mediahub_access::{AccessDecision, Where};
///
/// assert!(AccessDecision::from(true).is_allow());
/// let scoped = AccessDecision::Filter(Where::equals("owner", "u1"));
/// assert!(scoped.is_filter());
/// assert!(!scoped.is_deny());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum AccessDecision {
    /// Unconditional allow.
    Allow,
    /// Unconditional deny.
    Deny,
    /// Allow only documents matching the filter.
    Filter(Where),
}

impl AccessDecision {
    /// Check for unconditional allow.
    pub fn is_allow(&self) -> bool {
        matches!(self, AccessDecision::Allow)
    }

    /// Check for deny.
    pub fn is_deny(&self) -> bool {
        matches!(self, AccessDecision::Deny)
    }

    /// Check for a row filter.
    pub fn is_filter(&self) -> bool {
        matches!(self, AccessDecision::Filter(_))
    }

    /// The row filter, if any.
    pub fn filter(&self) -> Option<&Where> {
        match self {
            AccessDecision::Filter(filter) => Some(filter),
            _ => None,
        }
    }

    /// Label used in logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            AccessDecision::Allow => "allow",
            AccessDecision::Deny => "deny",
            AccessDecision::Filter(_) => "filter",
        }
    }
}

impl From<bool> for AccessDecision {
    fn from(allowed: bool) -> Self {
        if allowed {
            AccessDecision::Allow
        } else {
            AccessDecision::Deny
        }
    }
}

impl Serialize for AccessDecision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            AccessDecision::Allow => serializer.serialize_bool(true),
            AccessDecision::Deny => serializer.serialize_bool(false),
            AccessDecision::Filter(filter) => filter.serialize(serializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_accessors() {
        let filter = Where::equals("owner", "u1");
        assert_eq!(AccessDecision::Filter(filter.clone()).filter(), Some(&filter));
        assert_eq!(AccessDecision::Allow.filter(), None);
        assert!(AccessDecision::from(true).is_allow());
        assert!(AccessDecision::from(false).is_deny());
        assert_eq!(AccessDecision::Filter(filter).as_str(), "filter");
    }

    #[test]
    fn test_wire_shape() {
        assert_eq!(serde_json::to_value(AccessDecision::Allow).unwrap(), json!(true));
        assert_eq!(serde_json::to_value(AccessDecision::Deny).unwrap(), json!(false));
        assert_eq!(
            serde_json::to_value(AccessDecision::Filter(Where::equals("owner", "u1"))).unwrap(),
            json!({"owner": {"equals": "u1"}})
        );
    }
}
