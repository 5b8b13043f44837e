//! # Operations
//!
//! The four operations a host evaluates access for.

use serde::{Deserialize, Serialize};

/// Operation being authorized.
///
/// Collection-level rules exist for all four; field-level rules only for
/// `Create`, `Read` and `Update`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Create a new document.
    Create,
    /// Read or list documents.
    Read,
    /// Modify an existing document.
    Update,
    /// Remove a document.
    Delete,
}

impl Operation {
    /// Get the string representation of the operation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::Read => "read",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }

    /// Get all operations.
    pub fn all() -> [Self; 4] {
        [
            Operation::Create,
            Operation::Read,
            Operation::Update,
            Operation::Delete,
        ]
    }

    /// Check if this operation can be checked at field level.
    pub fn has_field_access(&self) -> bool {
        !matches!(self, Operation::Delete)
    }
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
