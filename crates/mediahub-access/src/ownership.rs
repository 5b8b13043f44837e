//! Ownership checks
//!
//! Compares the acting principal with an owner-bearing field on the target
//! document. Both sides go through [`canonical_id`], so an owner stored as
//! `"u1"`, `{"id": "u1"}` or `[{"id": "u1"}, "u2"]` (has-many) all match
//! principal `u1`.
//!
//! Ownership is only proven from the persisted document snapshot. Missing
//! principal, missing document, missing field or an unusable id all mean
//! "not the owner".

use mediahub_roles::canonical_id;
use serde_json::Value;

use crate::context::RequestContext;

/// Which principal identity an owner field refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OwnerKey {
    /// The user id.
    #[default]
    User,
    /// The linked creator profile id.
    Profile,
}

/// Canonical ids held by an owner field.
///
/// A single reference yields one id; a has-many array yields every usable
/// element. Unusable entries are skipped.
pub fn owner_ids(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(canonical_id).collect(),
        single => canonical_id(single).into_iter().collect(),
    }
}

/// Check whether the principal owns the target through `field`.
pub fn is_owner_by(ctx: &RequestContext, field: &str, key: OwnerKey) -> bool {
    let Some(principal) = ctx.principal() else {
        return false;
    };
    let expected = match key {
        OwnerKey::User => Some(principal.id.as_str()),
        OwnerKey::Profile => principal.profile_id.as_deref(),
    };
    let Some(expected) = expected else {
        return false;
    };

    ctx.document_field(field)
        .is_some_and(|value| owner_ids(value).iter().any(|id| id == expected))
}

/// Check whether the principal's user id owns the target through `field`.
///
/// # Example
///
/// ```
/// use mediahub_access::{ownership::is_owner, Operation, RequestContext};
/// use mediahub_roles::Principal;
/// use serde_json::json;
///
/// let ctx = RequestContext::new(Operation::Update)
///     .with_principal(Principal::new("u1"))
///     .with_document(json!({"owner": {"id": "u1"}}));
/// assert!(is_owner(&ctx, "owner"));
///
/// let ctx = ctx.with_document(json!({"owner": "u2"}));
/// assert!(!is_owner(&ctx, "owner"));
/// ```
pub fn is_owner(ctx: &RequestContext, field: &str) -> bool {
    is_owner_by(ctx, field, OwnerKey::User)
}

/// Check whether the target document *is* the principal (users collection).
pub fn is_self(ctx: &RequestContext) -> bool {
    match (ctx.principal_id(), ctx.target_id()) {
        (Some(principal), Some(target)) => principal == target,
        _ => false,
    }
}

/// Ownership predicate over a user-id field, for use with
/// [`self_or_role`](crate::predicates::self_or_role).
pub fn owned_by(
    field: impl Into<String>,
) -> impl Fn(&RequestContext) -> bool + Clone + Send + Sync {
    let field = field.into();
    move |ctx: &RequestContext| is_owner_by(ctx, &field, OwnerKey::User)
}

/// Ownership predicate over a profile-id field.
pub fn owned_by_profile(
    field: impl Into<String>,
) -> impl Fn(&RequestContext) -> bool + Clone + Send + Sync {
    let field = field.into();
    move |ctx: &RequestContext| is_owner_by(ctx, &field, OwnerKey::Profile)
}
