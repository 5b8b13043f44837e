//! Access layer configuration.
//!
//! Loaded from environment variables with defaults suitable for local
//! development. Only the public read channel has secrets; everything else
//! is behaviour toggles.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// One half of a paired setting is present without the other.
    #[error("{present} is set but {missing} is not")]
    MissingPair {
        /// Variable that was set.
        present: &'static str,
        /// Variable that is required alongside it.
        missing: &'static str,
    },

    /// Invalid configuration value.
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue {
        /// Configuration key.
        key: String,
        /// Error message.
        message: String,
    },
}

const PUBLIC_API_KEY_VAR: &str = "MEDIAHUB_PUBLIC_API_KEY";
const PUBLIC_FETCH_CODE_VAR: &str = "MEDIAHUB_PUBLIC_FETCH_CODE";
const LOOKUP_CACHE_VAR: &str = "MEDIAHUB_LOOKUP_CACHE";

/// Access layer configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    /// API key accepted on the public read channel.
    pub public_api_key: Option<String>,

    /// Fetch code that must accompany the public API key.
    pub public_fetch_code: Option<String>,

    /// Reuse delegation lookups within a single request.
    pub lookup_cache: bool,
}

impl Default for AccessConfig {
    /// Public channel disabled, per-request lookup cache on.
    fn default() -> Self {
        Self {
            public_api_key: None,
            public_fetch_code: None,
            lookup_cache: true,
        }
    }
}

impl std::fmt::Debug for AccessConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessConfig")
            .field("public_api_key", &self.public_api_key.as_ref().map(|_| "[REDACTED]"))
            .field("public_fetch_code", &self.public_fetch_code.as_ref().map(|_| "[REDACTED]"))
            .field("lookup_cache", &self.lookup_cache)
            .finish()
    }
}

impl AccessConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `MEDIAHUB_PUBLIC_API_KEY`: API key for the public read channel
    /// - `MEDIAHUB_PUBLIC_FETCH_CODE`: Fetch code paired with the API key
    /// - `MEDIAHUB_LOOKUP_CACHE`: Per-request delegation cache (default: true)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key/value source.
    pub fn from_lookup<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let default = Self::default();

        Self {
            public_api_key: get(PUBLIC_API_KEY_VAR),
            public_fetch_code: get(PUBLIC_FETCH_CODE_VAR),
            lookup_cache: get(LOOKUP_CACHE_VAR)
                .map(|s| s != "false" && s != "0")
                .unwrap_or(default.lookup_cache),
        }
    }

    /// Validate the configuration.
    ///
    /// The public channel secrets must be set together and be non-empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            (PUBLIC_API_KEY_VAR, &self.public_api_key),
            (PUBLIC_FETCH_CODE_VAR, &self.public_fetch_code),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "must not be empty".to_string(),
                });
            }
        }

        match (&self.public_api_key, &self.public_fetch_code) {
            (Some(_), None) => Err(ConfigError::MissingPair {
                present: PUBLIC_API_KEY_VAR,
                missing: PUBLIC_FETCH_CODE_VAR,
            }),
            (None, Some(_)) => Err(ConfigError::MissingPair {
                present: PUBLIC_FETCH_CODE_VAR,
                missing: PUBLIC_API_KEY_VAR,
            }),
            _ => Ok(()),
        }
    }

    /// Check whether the public read channel is configured.
    pub fn public_channel_enabled(&self) -> bool {
        self.public_api_key.is_some() && self.public_fetch_code.is_some()
    }
}
