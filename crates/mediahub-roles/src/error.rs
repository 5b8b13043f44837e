//! Error types for role hierarchy construction

use thiserror::Error;

use crate::role::Role;

/// Errors raised when building a custom [`RoleHierarchy`](crate::RoleHierarchy).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyError {
    /// A role was listed more than once
    #[error("Role listed more than once in hierarchy: {0}")]
    DuplicateRole(Role),

    /// No roles were given
    #[error("Role hierarchy must contain at least one role")]
    Empty,
}

/// Result type for hierarchy operations.
pub type HierarchyResult<T> = Result<T, HierarchyError>;
