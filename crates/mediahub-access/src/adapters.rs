//! Document-level and field-level access adapters.
//!
//! The host evaluates two kinds of access with different return contracts:
//!
//! ```text
//! DocumentAccess::evaluate -> AccessDecision   (true | false | where-clause)
//! FieldAccess::evaluate    -> bool             (true | false)
//! ```
//!
//! A rule that row-scopes is correct as document access and wrong as field
//! access, because a field check cannot apply a filter. Rules therefore only
//! reach the host through one of these two wrappers, and the field wrapper
//! turns a filter into `false`.
//!
//! Both wrappers also own the failure policy: an `Err` from a rule is logged
//! as an operational error and becomes a deny.

use std::sync::Arc;

use tracing::{debug, error, instrument};

use crate::context::RequestContext;
use crate::decision::AccessDecision;
use crate::error::{AccessError, AccessResult};
use crate::filter::Where;
use crate::rule::{AccessRule, SharedRule};

/// Host-facing document/collection access.
#[derive(Clone)]
pub struct DocumentAccess {
    rule: SharedRule,
}

impl DocumentAccess {
    /// Wrap a shared rule.
    pub fn from_shared(rule: SharedRule) -> Self {
        Self { rule }
    }

    /// Evaluate, passing allow/deny/filter through unchanged.
    ///
    /// Rule failures become [`AccessDecision::Deny`].
    #[instrument(
        name = "document_access",
        skip_all,
        fields(request_id = %ctx.request_id, operation = %ctx.operation)
    )]
    pub async fn evaluate(&self, ctx: &RequestContext) -> AccessDecision {
        match self.rule.evaluate(ctx).await {
            Ok(decision) => {
                debug!(decision = decision.as_str(), "Document access evaluated");
                decision
            }
            Err(e) => {
                error!(error = %e, collection = ?ctx.collection, "Access rule failed; denying");
                AccessDecision::Deny
            }
        }
    }

    /// Evaluate and map a deny to [`AccessError::Forbidden`].
    ///
    /// Returns `None` for unrestricted access or the filter to apply.
    pub async fn authorize(&self, ctx: &RequestContext) -> AccessResult<Option<Where>> {
        match self.evaluate(ctx).await {
            AccessDecision::Allow => Ok(None),
            AccessDecision::Filter(filter) => Ok(Some(filter)),
            AccessDecision::Deny => Err(AccessError::Forbidden),
        }
    }
}

impl std::fmt::Debug for DocumentAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentAccess").finish_non_exhaustive()
    }
}

/// Host-facing field access. Always resolves to a plain `bool`.
#[derive(Clone)]
pub struct FieldAccess {
    rule: SharedRule,
}

impl FieldAccess {
    /// Wrap a shared rule.
    pub fn from_shared(rule: SharedRule) -> Self {
        Self { rule }
    }

    /// Evaluate to a strict boolean.
    ///
    /// Only [`AccessDecision::Allow`] yields `true`. Filters and failures
    /// yield `false`.
    #[instrument(
        name = "field_access",
        skip_all,
        fields(request_id = %ctx.request_id, operation = %ctx.operation)
    )]
    pub async fn evaluate(&self, ctx: &RequestContext) -> bool {
        match self.rule.evaluate(ctx).await {
            Ok(AccessDecision::Allow) => true,
            Ok(AccessDecision::Deny) => false,
            Ok(AccessDecision::Filter(_)) => {
                debug!("Row filter at field level collapsed to deny");
                false
            }
            Err(e) => {
                error!(
                    error = %e,
                    collection = ?ctx.collection,
                    "Field access rule failed; denying"
                );
                false
            }
        }
    }
}

impl std::fmt::Debug for FieldAccess {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldAccess").finish_non_exhaustive()
    }
}

/// Expose a rule as document/collection access.
pub fn as_document_access<R>(rule: R) -> DocumentAccess
where
    R: AccessRule + 'static,
{
    DocumentAccess::from_shared(Arc::new(rule))
}

/// Expose a rule as field access (boolean only).
///
/// # Example
///
/// ```
/// use mediahub_access::predicates::owner_scoped;
/// use mediahub_access::{as_field_access, rule_fn, Operation, RequestContext};
/// use mediahub_roles::{Principal, Role};
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let field = as_field_access(rule_fn(owner_scoped("owner", Role::Staff)));
/// let ctx = RequestContext::new(Operation::Read).with_principal(Principal::new("u1"));
///
/// // The document-level rule would return a filter here.
/// assert_eq!(field.evaluate(&ctx).await, false);
/// # });
/// ```
pub fn as_field_access<R>(rule: R) -> FieldAccess
where
    R: AccessRule + 'static,
{
    FieldAccess::from_shared(Arc::new(rule))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::Operation;
    use crate::predicates::{owner_scoped, staff_or_above};
    use crate::rule::rule_fn;
    use async_trait::async_trait;
    use mediahub_roles::{Principal, Role};

    struct Broken;

    #[async_trait]
    impl AccessRule for Broken {
        async fn evaluate(&self, _ctx: &RequestContext) -> AccessResult<AccessDecision> {
            Err(AccessError::Lookup("connection refused".to_string()))
        }
    }

    fn free_user() -> RequestContext {
        RequestContext::new(Operation::Read)
            .with_principal(Principal::new("u1").with_role(Role::Free))
    }

    #[tokio::test]
    async fn test_document_access_passes_filter_through() {
        let access = as_document_access(rule_fn(owner_scoped("owner", Role::Staff)));
        assert_eq!(
            access.evaluate(&free_user()).await,
            AccessDecision::Filter(Where::equals("owner", "u1"))
        );
        assert_eq!(
            access.authorize(&free_user()).await.unwrap(),
            Some(Where::equals("owner", "u1"))
        );
    }

    #[tokio::test]
    async fn test_field_access_collapses_filter() {
        let access = as_field_access(rule_fn(owner_scoped("owner", Role::Staff)));
        assert!(!access.evaluate(&free_user()).await);

        let staff = RequestContext::new(Operation::Read)
            .with_principal(Principal::new("s1").with_role(Role::Staff));
        assert!(access.evaluate(&staff).await);
    }

    #[tokio::test]
    async fn test_failures_deny_on_both_surfaces() {
        let doc = as_document_access(Broken);
        let field = as_field_access(Broken);
        let ctx = free_user();

        assert!(doc.evaluate(&ctx).await.is_deny());
        assert!(matches!(doc.authorize(&ctx).await, Err(AccessError::Forbidden)));
        assert!(!field.evaluate(&ctx).await);
    }

    #[tokio::test]
    async fn test_authorize_maps_deny_to_forbidden() {
        let access = as_document_access(rule_fn(staff_or_above));
        assert!(matches!(access.authorize(&free_user()).await, Err(AccessError::Forbidden)));

        let staff = RequestContext::new(Operation::Read)
            .with_principal(Principal::new("s1").with_role(Role::Staff));
        assert_eq!(access.authorize(&staff).await.unwrap(), None);
    }
}
