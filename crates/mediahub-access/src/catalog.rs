//! # Platform access catalog
//!
//! Canonical access bundles for the platform's collections, composed only
//! from the predicate library, ownership helpers and delegation rules.
//!
//! | Collection | Create | Read | Update | Delete |
//! |---|---|---|---|---|
//! | `users` | anyone | self, or staff+ | self, or staff+ | admin |
//! | `articles` | staff+ | published, staff+, or public channel | staff+ | admin |
//! | `tracks` | creator+ | anyone | artist profile, or staff+ | artist profile, or admin |
//! | `orders` | authenticated | own orders, or staff+ | staff+ | admin |
//! | `group-posts` | authenticated | authenticated | creator, group mods, or staff+ | as update |
//! | `chat-messages` | participant | participant | sender, or staff+ | sender, or staff+ |
//!
//! Group mods are the parent group's admins and moderators.
//!
//! Field rules: `users.roles` is writable by admins only; `tracks.downloadUrl`
//! is readable by staff, the artist, or when `allowDownloads` is set.

use std::sync::Arc;

use mediahub_roles::Role;

use crate::adapters::{as_document_access, as_field_access, DocumentAccess};
use crate::channel::PublicChannel;
use crate::collection::{AccessPolicy, CollectionAccess, FieldAccessRules};
use crate::config::AccessConfig;
use crate::context::RequestContext;
use crate::delegation::{DocumentLookup, GroupDelegation};
use crate::ownership::{is_self, owned_by, owned_by_profile};
use crate::predicates::{
    admin, anyone, authenticated, creator_or_above, data_flag, owner_scoped, published_or_role,
    self_or_role, self_scoped, staff_or_above,
};
use crate::rule::{any_of, rule_fn, shared, SharedRule};

/// Collection slugs known to the catalog.
pub mod slugs {
    /// Platform accounts.
    pub const USERS: &str = "users";
    /// Editorial content.
    pub const ARTICLES: &str = "articles";
    /// Creator uploads.
    pub const TRACKS: &str = "tracks";
    /// Store orders.
    pub const ORDERS: &str = "orders";
    /// Community groups (delegation parent).
    pub const GROUPS: &str = "groups";
    /// Posts inside a group.
    pub const GROUP_POSTS: &str = "group-posts";
    /// Chat rooms (delegation parent).
    pub const CHATS: &str = "chats";
    /// Messages inside a chat.
    pub const CHAT_MESSAGES: &str = "chat-messages";
}

/// Users: self-service accounts.
pub fn users() -> CollectionAccess {
    CollectionAccess::new(
        as_document_access(rule_fn(anyone)),
        as_document_access(rule_fn(self_scoped(Role::Staff))),
        as_document_access(rule_fn(self_or_role(is_self, Role::Staff))),
        as_document_access(rule_fn(admin)),
    )
    .with_field(
        "roles",
        FieldAccessRules::new()
            .with_create(as_field_access(rule_fn(admin)))
            .with_update(as_field_access(rule_fn(admin))),
    )
}

/// Articles: published content is public, drafts are editorial.
///
/// With a configured [`PublicChannel`], valid credentials also read
/// unpublished articles.
pub fn articles(channel: Option<PublicChannel>) -> CollectionAccess {
    let published = shared(published_or_role(Role::Staff));
    let read = match channel {
        // Grants first: the published filter is never a deny.
        Some(channel) => as_document_access(any_of(vec![
            shared(staff_or_above),
            Arc::new(channel) as SharedRule,
            published,
        ])),
        None => DocumentAccess::from_shared(published),
    };

    CollectionAccess::new(
        as_document_access(rule_fn(staff_or_above)),
        read,
        as_document_access(rule_fn(staff_or_above)),
        as_document_access(rule_fn(admin)),
    )
}

/// Tracks: creators upload, the linked artist profile maintains.
pub fn tracks() -> CollectionAccess {
    let is_artist = owned_by_profile("artist");
    let download_url = any_of(vec![
        shared(staff_or_above),
        shared(move |ctx: &RequestContext| is_artist(ctx).into()),
        shared(data_flag("allowDownloads")),
    ]);

    CollectionAccess::new(
        as_document_access(rule_fn(creator_or_above)),
        as_document_access(rule_fn(anyone)),
        as_document_access(rule_fn(self_or_role(owned_by_profile("artist"), Role::Staff))),
        as_document_access(rule_fn(self_or_role(owned_by_profile("artist"), Role::Admin))),
    )
    .with_field("downloadUrl", FieldAccessRules::new().with_read(as_field_access(download_url)))
}

/// Orders: customers see their own.
pub fn orders() -> CollectionAccess {
    CollectionAccess::new(
        as_document_access(rule_fn(authenticated)),
        as_document_access(rule_fn(owner_scoped("customer", Role::Staff))),
        as_document_access(rule_fn(staff_or_above)),
        as_document_access(rule_fn(admin)),
    )
}

/// Group posts: moderated by the parent group's admins and moderators.
pub fn group_posts(lookup: Arc<dyn DocumentLookup>, cache: bool) -> CollectionAccess {
    let moderated = Arc::new(
        GroupDelegation::new(lookup, slugs::GROUPS, "group")
            .with_creator_field("author")
            .with_request_cache(cache),
    );

    CollectionAccess::new(
        as_document_access(rule_fn(authenticated)),
        as_document_access(rule_fn(authenticated)),
        DocumentAccess::from_shared(moderated.clone()),
        DocumentAccess::from_shared(moderated),
    )
}

/// Chat messages: visible to the chat's participants only.
pub fn chat_messages(lookup: Arc<dyn DocumentLookup>, cache: bool) -> CollectionAccess {
    let participants = Arc::new(
        GroupDelegation::new(lookup, slugs::CHATS, "chat")
            .with_membership_fields(["participants"])
            .with_creator_field("sender")
            .with_request_cache(cache),
    );
    // Other participants may read a message but not change it.
    let sender = shared(self_or_role(owned_by("sender"), Role::Staff));

    CollectionAccess::new(
        DocumentAccess::from_shared(participants.clone()),
        DocumentAccess::from_shared(participants),
        DocumentAccess::from_shared(sender.clone()),
        DocumentAccess::from_shared(sender),
    )
}

/// The full platform policy.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use mediahub_access::{catalog, AccessConfig, AccessResult, DocumentLookup};
///
/// fn build(lookup: Arc<dyn DocumentLookup>) -> AccessResult<()> {
///     let config = AccessConfig::from_env();
///     config.validate()?;
///     let policy = catalog::platform_policy(lookup, &config);
///     assert!(policy.get("articles").is_some());
///     Ok(())
/// }
/// ```
pub fn platform_policy(lookup: Arc<dyn DocumentLookup>, config: &AccessConfig) -> AccessPolicy {
    AccessPolicy::new()
        .register(slugs::USERS, users())
        .register(slugs::ARTICLES, articles(PublicChannel::from_config(config)))
        .register(slugs::TRACKS, tracks())
        .register(slugs::ORDERS, orders())
        .register(slugs::GROUP_POSTS, group_posts(lookup.clone(), config.lookup_cache))
        .register(slugs::CHAT_MESSAGES, chat_messages(lookup, config.lookup_cache))
}
