//! # Access predicates
//!
//! The catalog of synchronous rules collections are built from. Each is a
//! pure function of the [`RequestContext`]; parameterized predicates return
//! closures so they can be wrapped with [`rule_fn`](crate::rule_fn) or
//! [`shared`](crate::shared).
//!
//! ## Categories
//!
//! | Kind | Predicates |
//! |---|---|
//! | Unconditional | [`anyone`], [`nobody`] |
//! | Authentication | [`authenticated`] |
//! | Role-gated | [`has_role`], [`at_or_above`] |
//! | Tier shortcuts | [`admin`], [`staff_or_above`], [`creator_or_above`] |
//! | Self-or-role | [`self_or_role`] |
//! | Row-scoped | [`owner_scoped`], [`self_scoped`], [`published_or_role`] |
//! | Sibling data | [`data_flag`] |
//!
//! Every predicate that needs a principal denies anonymous callers before
//! looking at anything else.

use chrono::{SecondsFormat, Utc};
use mediahub_roles::{has_any_role, has_role_at_or_above, Role};
use serde_json::Value;

use crate::context::RequestContext;
use crate::decision::AccessDecision;
use crate::filter::Where;

/// Status value of published documents.
pub const PUBLISHED: &str = "published";

/// Always allow (public reads).
pub fn anyone(_ctx: &RequestContext) -> AccessDecision {
    AccessDecision::Allow
}

/// Always deny (locked operations).
pub fn nobody(_ctx: &RequestContext) -> AccessDecision {
    AccessDecision::Deny
}

/// Allow iff a principal is present.
pub fn authenticated(ctx: &RequestContext) -> AccessDecision {
    ctx.is_authenticated().into()
}

/// Allow iff the principal holds any of `roles` (flat membership).
pub fn has_role(
    roles: &[Role],
) -> impl Fn(&RequestContext) -> AccessDecision + Clone + Send + Sync {
    let roles = roles.to_vec();
    move |ctx: &RequestContext| has_any_role(ctx.principal(), &roles).into()
}

/// Allow iff the principal is at or above `threshold` in the hierarchy.
pub fn at_or_above(
    threshold: Role,
) -> impl Fn(&RequestContext) -> AccessDecision + Clone + Send + Sync {
    move |ctx: &RequestContext| has_role_at_or_above(ctx.principal(), threshold).into()
}

/// Admin tier only.
pub fn admin(ctx: &RequestContext) -> AccessDecision {
    at_or_above(Role::Admin)(ctx)
}

/// Staff or anything more privileged.
pub fn staff_or_above(ctx: &RequestContext) -> AccessDecision {
    at_or_above(Role::Staff)(ctx)
}

/// Creator or anything more privileged.
pub fn creator_or_above(ctx: &RequestContext) -> AccessDecision {
    at_or_above(Role::Creator)(ctx)
}

/// Allow iff the principal is at or above `threshold`, or `is_owner` holds.
///
/// The role check runs first: a privileged caller never depends on
/// ownership data being present or correct.
///
/// # Example
///
/// ```
/// use mediahub_access::{ownership::owned_by, predicates::self_or_role, Operation, RequestContext};
/// use mediahub_roles::{Principal, Role};
/// use serde_json::json;
///
/// let rule = self_or_role(owned_by("owner"), Role::Staff);
/// let doc = json!({"owner": "u1"});
///
/// let staff = RequestContext::new(Operation::Update)
///     .with_principal(Principal::new("s1").with_role(Role::Staff))
///     .with_document(doc.clone());
/// assert!(rule(&staff).is_allow());
///
/// let owner = RequestContext::new(Operation::Update)
///     .with_principal(Principal::new("u1").with_role(Role::Free))
///     .with_document(doc.clone());
/// assert!(rule(&owner).is_allow());
///
/// let stranger = RequestContext::new(Operation::Update)
///     .with_principal(Principal::new("u2").with_role(Role::Free))
///     .with_document(doc);
/// assert!(rule(&stranger).is_deny());
/// ```
pub fn self_or_role<O>(
    is_owner: O,
    threshold: Role,
) -> impl Fn(&RequestContext) -> AccessDecision + Clone + Send + Sync
where
    O: Fn(&RequestContext) -> bool + Clone + Send + Sync,
{
    move |ctx: &RequestContext| {
        if has_role_at_or_above(ctx.principal(), threshold) {
            return AccessDecision::Allow;
        }
        is_owner(ctx).into()
    }
}

/// Row-scoped access by owner field.
///
/// - `threshold` or above: allow everything
/// - any other principal: only documents whose `field` equals their id
/// - anonymous: deny
///
/// Document-level only. Wrapped with [`as_field_access`](crate::as_field_access)
/// the filter branch collapses to `false`.
pub fn owner_scoped(
    field: impl Into<String>,
    threshold: Role,
) -> impl Fn(&RequestContext) -> AccessDecision + Clone + Send + Sync {
    let field = field.into();
    move |ctx: &RequestContext| match ctx.principal() {
        None => AccessDecision::Deny,
        Some(principal) if has_role_at_or_above(Some(principal), threshold) => {
            AccessDecision::Allow
        }
        Some(principal) => {
            AccessDecision::Filter(Where::equals(field.clone(), principal.id.clone()))
        }
    }
}

/// Row-scoped access to the principal's own record (`id` field).
pub fn self_scoped(
    threshold: Role,
) -> impl Fn(&RequestContext) -> AccessDecision + Clone + Send + Sync {
    owner_scoped("id", threshold)
}

/// Published content for everyone, drafts and scheduled items for `threshold`
/// and above.
///
/// Non-privileged callers (anonymous included) get a filter on
/// `_status = published` and `publishedAt <= now`.
pub fn published_or_role(
    threshold: Role,
) -> impl Fn(&RequestContext) -> AccessDecision + Clone + Send + Sync {
    move |ctx: &RequestContext| {
        if has_role_at_or_above(ctx.principal(), threshold) {
            return AccessDecision::Allow;
        }
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        AccessDecision::Filter(
            Where::equals("_status", PUBLISHED).and(Where::less_than_equal("publishedAt", now)),
        )
    }
}

/// Allow iff the incoming/sibling boolean `field` is `true`.
///
/// For field-level rules that depend on a sibling toggle such as
/// `allowDownloads`.
pub fn data_flag(
    field: impl Into<String>,
) -> impl Fn(&RequestContext) -> AccessDecision + Clone + Send + Sync {
    let field = field.into();
    move |ctx: &RequestContext| {
        let set = |value: Option<&Value>| value == Some(&Value::Bool(true));
        (set(ctx.data_field(&field)) || set(ctx.document_field(&field))).into()
    }
}
