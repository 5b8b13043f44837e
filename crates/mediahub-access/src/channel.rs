//! Public read channel.
//!
//! Some integrations (embeds, partner widgets) read content without a user
//! session by presenting a shared API key together with a fetch code. The
//! channel is its own grant: it does not impersonate any role and it only
//! ever allows reads.

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::config::AccessConfig;
use crate::context::{PublicCredentials, RequestContext};
use crate::decision::AccessDecision;
use crate::error::AccessResult;
use crate::operation::Operation;
use crate::rule::AccessRule;

/// Configured public channel secrets, held as SHA-256 digests.
#[derive(Clone)]
pub struct PublicChannel {
    api_key_digest: [u8; 32],
    fetch_code_digest: [u8; 32],
}

impl PublicChannel {
    /// Create a channel accepting exactly this key and fetch code.
    pub fn new(api_key: &str, fetch_code: &str) -> Self {
        Self {
            api_key_digest: digest(api_key),
            fetch_code_digest: digest(fetch_code),
        }
    }

    /// Build from configuration; `None` when the channel is not configured.
    pub fn from_config(config: &AccessConfig) -> Option<Self> {
        if !config.public_channel_enabled() {
            return None;
        }
        let key = config.public_api_key.as_deref()?;
        let code = config.public_fetch_code.as_deref()?;
        Some(Self::new(key, code))
    }

    /// Check presented credentials.
    ///
    /// Both values are hashed before comparison so the comparison time does
    /// not depend on how much of the secret matched.
    pub fn verify(&self, credentials: &PublicCredentials) -> bool {
        let key_ok = digest(&credentials.api_key) == self.api_key_digest;
        let code_ok = digest(&credentials.fetch_code) == self.fetch_code_digest;
        key_ok & code_ok
    }

    /// Allow reads carrying valid credentials; deny everything else.
    pub fn check(&self, ctx: &RequestContext) -> AccessDecision {
        if ctx.operation != Operation::Read {
            return AccessDecision::Deny;
        }
        ctx.credentials
            .as_ref()
            .is_some_and(|creds| self.verify(creds))
            .into()
    }
}

impl std::fmt::Debug for PublicChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicChannel").finish_non_exhaustive()
    }
}

#[async_trait]
impl AccessRule for PublicChannel {
    async fn evaluate(&self, ctx: &RequestContext) -> AccessResult<AccessDecision> {
        Ok(self.check(ctx))
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}
