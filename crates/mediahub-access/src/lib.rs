//! # MediaHub Access
//!
//! Access evaluation for MediaHub collections: predicates, row filters,
//! delegation lookups and the adapters the CMS host calls.
//!
//! ## Overview
//!
//! The mediahub-access crate handles:
//! - **Context**: One typed [`RequestContext`] per operation
//! - **Decisions**: Allow, deny, or a row-scoping [`Where`] filter
//! - **Predicates**: Role gates, ownership, self-or-role, publish state
//! - **Delegation**: Membership checks against a parent container
//! - **Adapters**: Document-level and field-level entry points
//! - **Catalog**: The platform's collection bundles
//!
//! ## Architecture
//!
//! ```text
//! host ──► AccessPolicy ──► CollectionAccess ──► DocumentAccess ──► AccessRule
//!                                 │                                   │
//!                                 └──► FieldAccess (filter ⇒ false) ──┤
//!                                                                     ▼
//!                                              predicates / AnyOf / GroupDelegation
//!                                                                     │
//!                                                                     ▼
//!                                                               DocumentLookup
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use mediahub_access::{
//!     any_of, as_document_access, as_field_access, ownership::owned_by, predicates,
//!     rule_fn, shared, AccessDecision, Operation, RequestContext, Where,
//! };
//! use mediahub_roles::{Principal, Role};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! // Staff see every order, customers only their own.
//! let read = as_document_access(rule_fn(predicates::owner_scoped("customer", Role::Staff)));
//!
//! let customer = RequestContext::new(Operation::Read)
//!     .with_principal(Principal::new("u1").with_role(Role::Free));
//! assert_eq!(
//!     read.evaluate(&customer).await,
//!     AccessDecision::Filter(Where::equals("customer", "u1"))
//! );
//!
//! // Field rules resolve to a plain bool.
//! let notes = as_field_access(any_of(vec![
//!     shared(predicates::staff_or_above),
//!     shared(predicates::self_or_role(owned_by("customer"), Role::Admin)),
//! ]));
//! assert!(!notes.evaluate(&customer).await);
//! # });
//! ```
//!
//! ## Failure Policy
//!
//! - Anonymous callers fail every predicate that needs a principal
//! - An empty or unrecognized role list grants nothing
//! - A missing parent document denies
//! - A lookup infrastructure error is logged and denies at the adapter

pub mod adapters;
mod cache;
pub mod catalog;
pub mod channel;
pub mod collection;
pub mod config;
pub mod context;
pub mod decision;
pub mod delegation;
pub mod error;
pub mod filter;
pub mod operation;
pub mod ownership;
pub mod predicates;
pub mod rule;

// Re-export main types for convenience
pub use adapters::{as_document_access, as_field_access, DocumentAccess, FieldAccess};
pub use channel::PublicChannel;
pub use collection::{AccessPolicy, CollectionAccess, FieldAccessRules};
pub use config::{AccessConfig, ConfigError};
pub use context::{PublicCredentials, RequestContext};
pub use decision::AccessDecision;
pub use delegation::{DocumentLookup, GroupDelegation, LookupError};
pub use error::{AccessError, AccessResult};
pub use filter::Where;
pub use operation::Operation;
pub use rule::{any_of, rule_fn, shared, AccessRule, AnyOf, FnRule, SharedRule};
