//! Role hierarchy
//!
//! A single ordered list of roles, most privileged first, plus the comparison
//! primitives every access rule is built on. Rules written as "staff or
//! above" pick up new tiers automatically when the ladder changes here.

use std::borrow::Cow;

use crate::error::{HierarchyError, HierarchyResult};
use crate::principal::{Principal, RoleSet};
use crate::role::Role;

/// The platform ladder: `admin > staff > creator > free`.
pub static ROLE_HIERARCHY: RoleHierarchy = RoleHierarchy {
    order: Cow::Borrowed(&[Role::Admin, Role::Staff, Role::Creator, Role::Free]),
};

/// Total order over roles, index 0 = most privileged.
///
/// Roles missing from the hierarchy rank below every listed role and never
/// satisfy an at-or-above check, on either side of the comparison.
///
/// # Examples
///
/// ```
/// use mediahub_roles::{Principal, Role, ROLE_HIERARCHY};
///
/// let creator = Principal::new("u1").with_role(Role::Creator);
/// assert!(!ROLE_HIERARCHY.has_role_at_or_above(Some(&creator), Role::Staff));
/// assert!(ROLE_HIERARCHY.has_role_at_or_above(Some(&creator), Role::Free));
/// assert!(!ROLE_HIERARCHY.has_role_at_or_above(None, Role::Free));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleHierarchy {
    order: Cow<'static, [Role]>,
}

impl RoleHierarchy {
    /// Build a custom hierarchy.
    ///
    /// # Errors
    ///
    /// - [`HierarchyError::Empty`] if no roles are given
    /// - [`HierarchyError::DuplicateRole`] if a role appears twice
    pub fn new<I>(order: I) -> HierarchyResult<Self>
    where
        I: IntoIterator<Item = Role>,
    {
        let mut roles: Vec<Role> = Vec::new();
        for role in order {
            if roles.contains(&role) {
                return Err(HierarchyError::DuplicateRole(role));
            }
            roles.push(role);
        }
        if roles.is_empty() {
            return Err(HierarchyError::Empty);
        }
        Ok(Self {
            order: Cow::Owned(roles),
        })
    }

    /// Roles in order, most privileged first.
    pub fn roles(&self) -> &[Role] {
        &self.order
    }

    /// Position of `role`, or `None` when it is not part of this hierarchy.
    pub fn index_of(&self, role: Role) -> Option<usize> {
        self.order.iter().position(|r| *r == role)
    }

    /// Most privileged recognized role in `roles`.
    pub fn highest(&self, roles: &RoleSet) -> Option<Role> {
        roles
            .iter()
            .filter_map(|role| self.index_of(role).map(|idx| (idx, role)))
            .min_by_key(|(idx, _)| *idx)
            .map(|(_, role)| role)
    }

    /// Check whether any role in `roles` sits at or above `required`.
    ///
    /// False when `roles` has no recognized role or `required` is not in
    /// this hierarchy.
    pub fn is_at_or_above(&self, roles: &RoleSet, required: Role) -> bool {
        let Some(required_idx) = self.index_of(required) else {
            tracing::debug!(role = %required, "Required role missing from hierarchy");
            return false;
        };

        self.highest(roles)
            .and_then(|role| self.index_of(role))
            .is_some_and(|best| best <= required_idx)
    }

    /// Check whether a (possibly anonymous) principal is at or above `required`.
    pub fn has_role_at_or_above(&self, principal: Option<&Principal>, required: Role) -> bool {
        principal.is_some_and(|p| self.is_at_or_above(&p.roles, required))
    }
}

impl Default for RoleHierarchy {
    fn default() -> Self {
        ROLE_HIERARCHY.clone()
    }
}

/// [`RoleHierarchy::has_role_at_or_above`] against the platform ladder.
pub fn has_role_at_or_above(principal: Option<&Principal>, required: Role) -> bool {
    ROLE_HIERARCHY.has_role_at_or_above(principal, required)
}

/// True iff the principal holds at least one of `allowed`. No ordering.
pub fn has_any_role(principal: Option<&Principal>, allowed: &[Role]) -> bool {
    principal.is_some_and(|p| p.roles.contains_any(allowed))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with(roles: &[Role]) -> Principal {
        Principal::new("u1").with_roles(roles.iter().copied())
    }

    #[test]
    fn test_default_order() {
        assert_eq!(
            ROLE_HIERARCHY.roles(),
            &[Role::Admin, Role::Staff, Role::Creator, Role::Free]
        );
        assert_eq!(ROLE_HIERARCHY.index_of(Role::Admin), Some(0));
        assert_eq!(ROLE_HIERARCHY.index_of(Role::Free), Some(3));
    }

    #[test]
    fn test_hierarchy_monotonicity() {
        let roles = ROLE_HIERARCHY.roles();
        for (i, higher) in roles.iter().enumerate() {
            for lower in &roles[i + 1..] {
                let p_high = with(&[*higher]);
                let p_low = with(&[*lower]);
                assert!(has_role_at_or_above(Some(&p_high), *lower));
                assert!(!has_role_at_or_above(Some(&p_low), *higher));
            }
            assert!(has_role_at_or_above(Some(&with(&[*higher])), *higher));
        }
    }

    #[test]
    fn test_lower_role_passes_when_higher_also_held() {
        let p = with(&[Role::Free, Role::Staff]);
        assert!(has_role_at_or_above(Some(&p), Role::Staff));
        assert!(!has_role_at_or_above(Some(&p), Role::Admin));
    }

    #[test]
    fn test_fail_closed_on_empty_roles() {
        let p = with(&[]);
        for role in Role::all() {
            assert!(!has_role_at_or_above(Some(&p), role));
            assert!(!has_any_role(Some(&p), &[role]));
        }
    }

    #[test]
    fn test_anonymous_never_qualifies() {
        assert!(!has_role_at_or_above(None, Role::Free));
        assert!(!has_any_role(None, &Role::all()));
    }

    #[test]
    fn test_has_any_role_ignores_order() {
        let p = with(&[Role::Creator]);
        assert!(has_any_role(Some(&p), &[Role::Admin, Role::Creator]));
        assert!(!has_any_role(Some(&p), &[Role::Admin, Role::Staff]));
        assert!(!has_any_role(Some(&p), &[]));
    }

    #[test]
    fn test_custom_hierarchy_missing_role_fails_closed() {
        let ladder = RoleHierarchy::new([Role::Admin, Role::Staff]).unwrap();
        let creator = with(&[Role::Creator]);
        let staff = with(&[Role::Staff]);

        assert_eq!(ladder.index_of(Role::Creator), None);
        // Holder of an unlisted role gets nothing.
        assert!(!ladder.has_role_at_or_above(Some(&creator), Role::Staff));
        // Requirement on an unlisted role is never satisfied, even by staff.
        assert!(!ladder.has_role_at_or_above(Some(&staff), Role::Creator));
    }

    #[test]
    fn test_custom_hierarchy_validation() {
        assert!(matches!(
            RoleHierarchy::new([Role::Admin, Role::Admin]),
            Err(HierarchyError::DuplicateRole(Role::Admin))
        ));
        assert!(matches!(RoleHierarchy::new([]), Err(HierarchyError::Empty)));
    }

    #[test]
    fn test_highest_role() {
        let roles: RoleSet = [Role::Free, Role::Creator].into_iter().collect();
        assert_eq!(ROLE_HIERARCHY.highest(&roles), Some(Role::Creator));
        assert_eq!(ROLE_HIERARCHY.highest(&RoleSet::new()), None);
    }
}
