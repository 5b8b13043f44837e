//! # MediaHub Roles
//!
//! Role hierarchy and principal model for the MediaHub access layer.
//!
//! ## Overview
//!
//! The mediahub-roles crate handles:
//! - **Roles**: The closed set of privilege tiers (`admin`, `staff`, `creator`, `free`)
//! - **Hierarchy**: One ordered ladder answering "is A at least as privileged as B"
//! - **Principals**: The acting user, parsed leniently from host user documents
//! - **Identifiers**: Canonical id normalization shared by every ownership check
//!
//! ## Architecture
//!
//! ```text
//! ROLE_HIERARCHY = [admin, staff, creator, free]
//!                    0      1      2        3     (lower index = more privilege)
//!
//! has_role_at_or_above(principal, staff)
//!   = min(index of principal's recognized roles) <= index(staff)
//! ```
//!
//! ## Usage
//!
//! ```rust
//! use mediahub_roles::{has_any_role, has_role_at_or_above, Principal, Role};
//!
//! let creator = Principal::new("u1").with_role(Role::Creator);
//!
//! assert!(has_role_at_or_above(Some(&creator), Role::Free));
//! assert!(!has_role_at_or_above(Some(&creator), Role::Staff));
//! assert!(has_any_role(Some(&creator), &[Role::Creator, Role::Staff]));
//!
//! // Anonymous and role-less principals never qualify
//! assert!(!has_role_at_or_above(None, Role::Free));
//! assert!(!has_role_at_or_above(Some(&Principal::new("u2")), Role::Free));
//! ```
//!
//! ## Fail-Closed Rules
//!
//! - Missing, null or non-array role data parses as an empty set
//! - Unknown role names are ignored
//! - A role absent from the hierarchy grants nothing and cannot be satisfied

pub mod error;
pub mod hierarchy;
pub mod id;
pub mod principal;
pub mod role;

// Re-export main types for convenience
pub use error::{HierarchyError, HierarchyResult};
pub use hierarchy::{has_any_role, has_role_at_or_above, RoleHierarchy, ROLE_HIERARCHY};
pub use id::canonical_id;
pub use principal::{Principal, RoleSet};
pub use role::Role;
