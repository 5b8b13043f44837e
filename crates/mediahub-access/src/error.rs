//! Error types for access evaluation
//!
//! A failed access check is not an error: it is `AccessDecision::Deny`.
//! The variants here cover the host-facing denial mapping and genuine
//! infrastructure failures, which callers must always treat as a deny.

use thiserror::Error;

use crate::config::ConfigError;

/// Access layer error types.
#[derive(Debug, Error)]
pub enum AccessError {
    /// Operation denied. The message never says why.
    #[error("You are not allowed to perform this action")]
    Forbidden,

    /// A delegation lookup failed for a reason other than "not found"
    #[error("Lookup failed: {0}")]
    Lookup(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Result type for access operations.
pub type AccessResult<T> = Result<T, AccessError>;

impl AccessError {
    /// Check if this error should be logged at error level.
    ///
    /// Denials are expected traffic; lookup and config failures are not.
    pub fn is_server_error(&self) -> bool {
        matches!(self, AccessError::Lookup(_) | AccessError::Config(_))
    }

    /// Get HTTP status code for this error.
    ///
    /// Lookup failures still surface to the user as a plain 403 so that the
    /// response does not reveal whether the related resource exists.
    pub fn status_code(&self) -> u16 {
        match self {
            AccessError::Forbidden | AccessError::Lookup(_) => 403,
            AccessError::Config(_) => 500,
        }
    }

    /// Get error code for API responses.
    pub fn error_code(&self) -> &'static str {
        match self {
            AccessError::Forbidden | AccessError::Lookup(_) => "FORBIDDEN",
            AccessError::Config(_) => "CONFIG_ERROR",
        }
    }
}
