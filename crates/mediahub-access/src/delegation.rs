//! Group and organization delegation.
//!
//! Some resources (group posts, chat messages, event listings) are moderated
//! by the members of a parent container rather than by global roles alone.
//! Deciding access then needs the parent's membership lists, which may not
//! be in the request. [`GroupDelegation`] reads them from the snapshot when
//! the parent is already expanded and otherwise fetches the parent once
//! through a [`DocumentLookup`].

use std::sync::Arc;

use async_trait::async_trait;
use mediahub_roles::{canonical_id, has_role_at_or_above, Role};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::context::RequestContext;
use crate::decision::AccessDecision;
use crate::error::{AccessError, AccessResult};
use crate::ownership::{is_owner, owner_ids};
use crate::rule::AccessRule;

/// Lookup collaborator errors.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The document does not exist (or is not visible to the lookup).
    #[error("{collection} document not found: {id}")]
    NotFound {
        /// Collection searched.
        collection: String,
        /// Requested id.
        id: String,
    },

    /// The backing store could not be reached.
    #[error("Lookup backend unavailable: {0}")]
    Unavailable(String),

    /// Any other backend failure.
    #[error("Lookup backend error: {0}")]
    Backend(String),
}

/// Fetch a document by id. Implemented by the host's data layer.
///
/// Returning `Ok(None)` and `Err(LookupError::NotFound)` are equivalent.
#[async_trait]
pub trait DocumentLookup: Send + Sync {
    /// Fetch one document from `collection`.
    async fn find_by_id(&self, collection: &str, id: &str) -> Result<Option<Value>, LookupError>;
}

/// Default membership lists on a parent container.
pub const DEFAULT_MEMBERSHIP_FIELDS: [&str; 2] = ["admins", "moderators"];

/// Delegated access through a parent container's membership.
///
/// Allows, in order:
///
/// 1. principals at or above the override role (default `staff`)
/// 2. the resource's creator (`creator_field` on the persisted document)
/// 3. principals listed in any membership field of the parent
///
/// Anonymous callers are denied outright. A missing or unknown parent denies.
/// A lookup that fails for any other reason is returned as
/// [`AccessError::Lookup`]; the adapters deny on it.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use mediahub_access::{DocumentLookup, GroupDelegation};
///
/// fn posts_rule(lookup: Arc<dyn DocumentLookup>) -> GroupDelegation {
///     GroupDelegation::new(lookup, "groups", "group")
///         .with_creator_field("author")
/// }
/// ```
pub struct GroupDelegation {
    lookup: Arc<dyn DocumentLookup>,
    parent_collection: String,
    parent_field: String,
    creator_field: String,
    membership_fields: Vec<String>,
    override_role: Role,
    use_cache: bool,
}

impl GroupDelegation {
    /// Delegate to the `parent_collection` document referenced by `parent_field`.
    pub fn new(
        lookup: Arc<dyn DocumentLookup>,
        parent_collection: impl Into<String>,
        parent_field: impl Into<String>,
    ) -> Self {
        Self {
            lookup,
            parent_collection: parent_collection.into(),
            parent_field: parent_field.into(),
            creator_field: "createdBy".to_string(),
            membership_fields: DEFAULT_MEMBERSHIP_FIELDS.iter().map(|f| f.to_string()).collect(),
            override_role: Role::Staff,
            use_cache: true,
        }
    }

    /// Field on the resource naming its creator.
    pub fn with_creator_field(mut self, field: impl Into<String>) -> Self {
        self.creator_field = field.into();
        self
    }

    /// Membership lists on the parent that grant access.
    pub fn with_membership_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.membership_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Role that bypasses delegation entirely.
    pub fn with_override_role(mut self, role: Role) -> Self {
        self.override_role = role;
        self
    }

    /// Reuse parent lookups made earlier in the same request.
    pub fn with_request_cache(mut self, enabled: bool) -> Self {
        self.use_cache = enabled;
        self
    }

    /// Parent reference: persisted document first, then incoming data.
    ///
    /// Returns the value and whether it came from the persisted snapshot.
    fn parent_ref<'a>(&self, ctx: &'a RequestContext) -> Option<(&'a Value, bool)> {
        ctx.document_field(&self.parent_field)
            .map(|value| (value, true))
            .or_else(|| ctx.data_field(&self.parent_field).map(|value| (value, false)))
    }

    /// An expanded parent carries every configured membership list.
    ///
    /// A partially populated parent is fetched so a missing list cannot deny a
    /// member listed there.
    fn is_expanded(&self, parent: &Value) -> bool {
        !self.membership_fields.is_empty()
            && parent
                .as_object()
                .is_some_and(|obj| self.membership_fields.iter().all(|f| obj.contains_key(f)))
    }

    fn is_member(&self, parent: &Value, principal_id: &str) -> bool {
        self.membership_fields.iter().any(|field| {
            parent
                .get(field)
                .is_some_and(|list| owner_ids(list).iter().any(|id| id == principal_id))
        })
    }

    async fn fetch_parent(
        &self,
        ctx: &RequestContext,
        principal_id: &str,
        id: &str,
    ) -> AccessResult<Option<Value>> {
        if self.use_cache {
            let cached = ctx.lookups().get(principal_id, &self.parent_collection, id).await;
            if let Some(cached) = cached {
                debug!(parent_id = %id, "Parent lookup served from request cache");
                return Ok(cached);
            }
        }

        let fetched = match self.lookup.find_by_id(&self.parent_collection, id).await {
            Ok(found) => found,
            Err(LookupError::NotFound { .. }) => None,
            Err(e) => return Err(AccessError::Lookup(e.to_string())),
        };

        if self.use_cache {
            ctx.lookups()
                .insert(principal_id, &self.parent_collection, id, fetched.clone())
                .await;
        }
        Ok(fetched)
    }
}

#[async_trait]
impl AccessRule for GroupDelegation {
    #[instrument(name = "group_delegation", skip_all, fields(request_id = %ctx.request_id))]
    async fn evaluate(&self, ctx: &RequestContext) -> AccessResult<AccessDecision> {
        let Some(principal) = ctx.principal() else {
            return Ok(AccessDecision::Deny);
        };

        if has_role_at_or_above(Some(principal), self.override_role) {
            return Ok(AccessDecision::Allow);
        }

        if is_owner(ctx, &self.creator_field) {
            return Ok(AccessDecision::Allow);
        }

        let Some((parent_ref, persisted)) = self.parent_ref(ctx) else {
            debug!(
                parent = %self.parent_collection,
                field = %self.parent_field,
                "No parent reference on target"
            );
            return Ok(AccessDecision::Deny);
        };

        // Only a persisted snapshot is trusted to carry membership lists;
        // an expanded parent in incoming data is reduced to its id.
        if persisted && self.is_expanded(parent_ref) {
            return Ok(self.is_member(parent_ref, &principal.id).into());
        }

        let Some(parent_id) = canonical_id(parent_ref) else {
            debug!(field = %self.parent_field, "Parent reference has no usable id");
            return Ok(AccessDecision::Deny);
        };

        match self.fetch_parent(ctx, &principal.id, &parent_id).await? {
            Some(parent) => Ok(self.is_member(&parent, &principal.id).into()),
            None => {
                warn!(
                    parent = %self.parent_collection,
                    parent_id = %parent_id,
                    "Parent not found; denying"
                );
                Ok(AccessDecision::Deny)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operation::Operation;
    use mediahub_roles::Principal;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct StubLookup {
        docs: HashMap<(String, String), Value>,
        calls: AtomicUsize,
        fail_with: Option<fn() -> LookupError>,
    }

    impl StubLookup {
        fn with_doc(mut self, collection: &str, id: &str, doc: Value) -> Self {
            self.docs.insert((collection.to_string(), id.to_string()), doc);
            self
        }
    }

    #[async_trait]
    impl DocumentLookup for StubLookup {
        async fn find_by_id(
            &self,
            collection: &str,
            id: &str,
        ) -> Result<Option<Value>, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(make_err) = self.fail_with {
                return Err(make_err());
            }
            Ok(self.docs.get(&(collection.to_string(), id.to_string())).cloned())
        }
    }

    fn groups() -> StubLookup {
        StubLookup::default().with_doc(
            "groups",
            "g1",
            json!({"id": "g1", "admins": [{"id": "a1"}], "moderators": ["m1"]}),
        )
    }

    fn post_ctx(user: &str) -> RequestContext {
        RequestContext::new(Operation::Update)
            .with_principal(Principal::new(user).with_role(Role::Free))
            .with_document(json!({"id": "post-1", "group": "g1", "createdBy": "author"}))
    }

    #[tokio::test]
    async fn test_creator_admin_moderator_and_stranger() {
        let lookup = Arc::new(groups());
        let rule = GroupDelegation::new(lookup.clone(), "groups", "group");

        assert!(rule.evaluate(&post_ctx("author")).await.unwrap().is_allow());
        assert!(rule.evaluate(&post_ctx("a1")).await.unwrap().is_allow());
        assert!(rule.evaluate(&post_ctx("m1")).await.unwrap().is_allow());
        assert!(rule.evaluate(&post_ctx("stranger")).await.unwrap().is_deny());
        // The creator check needs no lookup.
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_staff_override_skips_lookup() {
        let lookup = Arc::new(groups());
        let rule = GroupDelegation::new(lookup.clone(), "groups", "group");
        let ctx = RequestContext::new(Operation::Delete)
            .with_principal(Principal::new("s1").with_role(Role::Staff))
            .with_document(json!({"group": "g1"}));

        assert!(rule.evaluate(&ctx).await.unwrap().is_allow());
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_anonymous_denied() {
        let rule = GroupDelegation::new(Arc::new(groups()), "groups", "group");
        let ctx = RequestContext::new(Operation::Update).with_document(json!({"group": "g1"}));
        assert!(rule.evaluate(&ctx).await.unwrap().is_deny());
    }

    #[tokio::test]
    async fn test_expanded_parent_needs_no_lookup() {
        let lookup = Arc::new(StubLookup::default());
        let rule = GroupDelegation::new(lookup.clone(), "groups", "group");
        let ctx = RequestContext::new(Operation::Update)
            .with_principal(Principal::new("m1"))
            .with_document(json!({
                "group": {"id": "g1", "admins": [], "moderators": [{"id": "m1"}]}
            }));

        assert!(rule.evaluate(&ctx).await.unwrap().is_allow());
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_partially_expanded_parent_is_fetched() {
        let lookup = Arc::new(groups());
        let rule = GroupDelegation::new(lookup.clone(), "groups", "group");
        let ctx = RequestContext::new(Operation::Update)
            .with_principal(Principal::new("m1"))
            .with_document(json!({"group": {"id": "g1", "admins": ["a1"]}}));

        assert!(rule.evaluate(&ctx).await.unwrap().is_allow());
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_expanded_parent_in_incoming_data_is_not_trusted() {
        let lookup = Arc::new(groups());
        let rule = GroupDelegation::new(lookup.clone(), "groups", "group");
        let ctx = RequestContext::new(Operation::Create)
            .with_principal(Principal::new("mallory"))
            .with_data(json!({"group": {"id": "g1", "admins": ["mallory"]}}));

        assert!(rule.evaluate(&ctx).await.unwrap().is_deny());
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_not_found_denies() {
        let rule = GroupDelegation::new(Arc::new(StubLookup::default()), "groups", "group");
        assert!(rule.evaluate(&post_ctx("a1")).await.unwrap().is_deny());

        let failing = StubLookup {
            fail_with: Some(|| LookupError::NotFound {
                collection: "groups".to_string(),
                id: "g1".to_string(),
            }),
            ..Default::default()
        };
        let rule = GroupDelegation::new(Arc::new(failing), "groups", "group");
        assert!(rule.evaluate(&post_ctx("a1")).await.unwrap().is_deny());
    }

    #[tokio::test]
    async fn test_backend_failure_is_an_error() {
        let failing = StubLookup {
            fail_with: Some(|| LookupError::Unavailable("timeout".to_string())),
            ..Default::default()
        };
        let rule = GroupDelegation::new(Arc::new(failing), "groups", "group");
        assert!(matches!(
            rule.evaluate(&post_ctx("a1")).await,
            Err(AccessError::Lookup(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_parent_reference_denies() {
        let lookup = Arc::new(groups());
        let rule = GroupDelegation::new(lookup.clone(), "groups", "group");
        let ctx = RequestContext::new(Operation::Update)
            .with_principal(Principal::new("a1"))
            .with_document(json!({"id": "post-1"}));

        assert!(rule.evaluate(&ctx).await.unwrap().is_deny());
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_request_cache_fetches_once() {
        let lookup = Arc::new(groups());
        let rule = GroupDelegation::new(lookup.clone(), "groups", "group");
        let ctx = post_ctx("a1");

        assert!(rule.evaluate(&ctx).await.unwrap().is_allow());
        assert!(rule.evaluate(&ctx).await.unwrap().is_allow());
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 1);
        assert_eq!(ctx.lookups().len().await, 1);

        // A new request starts with an empty cache.
        assert!(rule.evaluate(&post_ctx("a1")).await.unwrap().is_allow());
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_request_cache_not_shared_across_principals() {
        let lookup = Arc::new(groups());
        let rule = GroupDelegation::new(lookup.clone(), "groups", "group");
        let base = RequestContext::new(Operation::Update).with_document(json!({"group": "g1"}));

        let admin = base.clone().with_principal(Principal::new("a1"));
        let moderator = base.clone().with_principal(Principal::new("m1"));
        assert!(rule.evaluate(&admin).await.unwrap().is_allow());
        assert!(rule.evaluate(&moderator).await.unwrap().is_allow());
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 2);
        assert_eq!(moderator.lookups().len().await, 1);
    }

    #[tokio::test]
    async fn test_request_cache_can_be_disabled() {
        let lookup = Arc::new(groups());
        let rule =
            GroupDelegation::new(lookup.clone(), "groups", "group").with_request_cache(false);
        let ctx = post_ctx("a1");

        rule.evaluate(&ctx).await.unwrap();
        rule.evaluate(&ctx).await.unwrap();
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_custom_membership_and_override() {
        let lookup = Arc::new(StubLookup::default().with_doc(
            "chats",
            "c1",
            json!({"id": "c1", "participants": ["u1", "u2"]}),
        ));
        let rule = GroupDelegation::new(lookup, "chats", "chat")
            .with_membership_fields(["participants"])
            .with_creator_field("sender")
            .with_override_role(Role::Admin);

        let member = RequestContext::new(Operation::Read)
            .with_principal(Principal::new("u2"))
            .with_document(json!({"chat": "c1", "sender": "u1"}));
        let staff = RequestContext::new(Operation::Read)
            .with_principal(Principal::new("s1").with_role(Role::Staff))
            .with_document(json!({"chat": "c1", "sender": "u1"}));

        assert!(rule.evaluate(&member).await.unwrap().is_allow());
        assert!(rule.evaluate(&staff).await.unwrap().is_deny());
    }
}
