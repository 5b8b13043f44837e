//! Access rule trait and composition.
//!
//! Every rule is evaluated through [`AccessRule`], which is async even though
//! most rules are pure functions. Only delegation rules actually await
//! anything, but callers get one calling convention for all of them.

use std::sync::Arc;

use async_trait::async_trait;

use crate::context::RequestContext;
use crate::decision::AccessDecision;
use crate::error::AccessResult;

/// A document-level access rule.
///
/// Returns `Ok(AccessDecision::Deny)` for ordinary denial. `Err` is reserved
/// for infrastructure failures; the adapters turn it into a deny.
#[async_trait]
pub trait AccessRule: Send + Sync {
    /// Evaluate the rule for one request.
    async fn evaluate(&self, ctx: &RequestContext) -> AccessResult<AccessDecision>;
}

/// Shared, type-erased rule.
pub type SharedRule = Arc<dyn AccessRule>;

#[async_trait]
impl<R> AccessRule for Arc<R>
where
    R: AccessRule + ?Sized,
{
    async fn evaluate(&self, ctx: &RequestContext) -> AccessResult<AccessDecision> {
        (**self).evaluate(ctx).await
    }
}

/// Adapts a synchronous predicate into an [`AccessRule`].
#[derive(Clone)]
pub struct FnRule<F> {
    predicate: F,
}

/// Wrap a synchronous predicate.
///
/// # Example
///
/// ```
/// use mediahub_access::{predicates, rule_fn, AccessRule, Operation, RequestContext};
///
/// # tokio_test_block(async {
/// let rule = rule_fn(predicates::authenticated);
/// let decision = rule.evaluate(&RequestContext::new(Operation::Read)).await.unwrap();
/// assert!(decision.is_deny());
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
/// # }
/// ```
pub fn rule_fn<F>(predicate: F) -> FnRule<F>
where
    F: Fn(&RequestContext) -> AccessDecision + Send + Sync,
{
    FnRule { predicate }
}

/// Wrap a synchronous predicate as a [`SharedRule`].
pub fn shared<F>(predicate: F) -> SharedRule
where
    F: Fn(&RequestContext) -> AccessDecision + Send + Sync + 'static,
{
    Arc::new(rule_fn(predicate))
}

#[async_trait]
impl<F> AccessRule for FnRule<F>
where
    F: Fn(&RequestContext) -> AccessDecision + Send + Sync,
{
    async fn evaluate(&self, ctx: &RequestContext) -> AccessResult<AccessDecision> {
        Ok((self.predicate)(ctx))
    }
}

/// Short-circuit OR over rules.
///
/// Rules run in order; the first decision that is not a deny is returned
/// and later rules are not evaluated. List overrides (admin, staff) before
/// ownership so a privileged caller is never stopped by an ownership
/// mismatch or handed a narrower filter.
pub struct AnyOf {
    rules: Vec<SharedRule>,
}

/// Build a short-circuit OR. An empty list denies.
pub fn any_of(rules: Vec<SharedRule>) -> AnyOf {
    AnyOf { rules }
}

#[async_trait]
impl AccessRule for AnyOf {
    async fn evaluate(&self, ctx: &RequestContext) -> AccessResult<AccessDecision> {
        for rule in &self.rules {
            match rule.evaluate(ctx).await? {
                AccessDecision::Deny => continue,
                granted => return Ok(granted),
            }
        }
        Ok(AccessDecision::Deny)
    }
}
