//! Request context
//!
//! The single value every access rule receives. The host builds one per
//! inbound operation and drops it when the operation completes; nothing in
//! it outlives the request.

use std::sync::Arc;

use mediahub_roles::{canonical_id, Principal};
use serde_json::Value;
use uuid::Uuid;

use crate::cache::LookupCache;
use crate::operation::Operation;

/// Credentials presented on the public read channel.
#[derive(Clone, PartialEq, Eq)]
pub struct PublicCredentials {
    /// Presented API key
    pub api_key: String,
    /// Presented fetch code
    pub fetch_code: String,
}

impl PublicCredentials {
    /// Bundle an API key and fetch code.
    pub fn new(api_key: impl Into<String>, fetch_code: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            fetch_code: fetch_code.into(),
        }
    }
}

impl std::fmt::Debug for PublicCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PublicCredentials")
            .field("api_key", &"[REDACTED]")
            .field("fetch_code", &"[REDACTED]")
            .finish()
    }
}

/// Everything an access rule may look at for one operation.
///
/// Optional fields model what the host may or may not have loaded:
///
/// - `document_id`: target id (update/delete, single-document read)
/// - `document`: persisted snapshot of the target, if loaded
/// - `data`: incoming or sibling field values (create/update payload, or the
///   sibling fields of the field being checked)
///
/// Ownership is only ever proven from `document`, never from `data`, because
/// `data` is caller-supplied.
///
/// # Examples
///
/// ```
/// use mediahub_access::{Operation, RequestContext};
/// use mediahub_roles::{Principal, Role};
/// use serde_json::json;
///
/// let ctx = RequestContext::new(Operation::Update)
///     .with_principal(Principal::new("u1").with_role(Role::Creator))
///     .with_document(json!({"id": "t-1", "owner": {"id": "u1"}}));
///
/// assert_eq!(ctx.principal_id(), Some("u1"));
/// assert_eq!(ctx.target_id().as_deref(), Some("t-1"));
/// ```
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Unique id for this request (logging and lookup cache scope)
    pub request_id: Uuid,

    /// Acting principal; `None` for anonymous requests
    pub principal: Option<Principal>,

    /// Operation being authorized
    pub operation: Operation,

    /// Collection slug, when known
    pub collection: Option<String>,

    /// Target document id
    pub document_id: Option<String>,

    /// Persisted snapshot of the target document
    pub document: Option<Value>,

    /// Incoming data or sibling field values
    pub data: Option<Value>,

    /// Public read channel credentials, if presented
    pub credentials: Option<PublicCredentials>,

    lookups: Arc<LookupCache>,
}

impl RequestContext {
    /// Creates an anonymous context for `operation`.
    pub fn new(operation: Operation) -> Self {
        Self {
            request_id: Uuid::now_v7(),
            principal: None,
            operation,
            collection: None,
            document_id: None,
            document: None,
            data: None,
            credentials: None,
            lookups: Arc::new(LookupCache::new()),
        }
    }

    /// Set the acting principal.
    ///
    /// Starts a fresh lookup cache, so a context cloned from a shared base
    /// does not carry another principal's lookups.
    pub fn with_principal(self, principal: Principal) -> Self {
        self.with_optional_principal(Some(principal))
    }

    /// Set or clear the acting principal. Starts a fresh lookup cache.
    pub fn with_optional_principal(mut self, principal: Option<Principal>) -> Self {
        self.principal = principal;
        self.lookups = Arc::new(LookupCache::new());
        self
    }

    /// Set the collection slug.
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = Some(collection.into());
        self
    }

    /// Set the target document id.
    pub fn with_document_id(mut self, id: impl Into<String>) -> Self {
        self.document_id = Some(id.into());
        self
    }

    /// Attach the persisted target document.
    pub fn with_document(mut self, document: Value) -> Self {
        self.document = Some(document);
        self
    }

    /// Attach incoming or sibling data.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Attach public channel credentials.
    pub fn with_credentials(mut self, credentials: PublicCredentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// The acting principal, if authenticated.
    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    /// The acting principal's id, if authenticated.
    pub fn principal_id(&self) -> Option<&str> {
        self.principal.as_ref().map(|p| p.id.as_str())
    }

    /// Check whether a principal is present.
    pub fn is_authenticated(&self) -> bool {
        self.principal.is_some()
    }

    /// Target id: the explicit `document_id`, else the snapshot's `id`.
    pub fn target_id(&self) -> Option<String> {
        self.document_id
            .clone()
            .or_else(|| self.document.as_ref().and_then(canonical_id))
    }

    /// Field of the persisted document, by dot-separated path.
    pub fn document_field(&self, path: &str) -> Option<&Value> {
        self.document.as_ref().and_then(|doc| lookup_path(doc, path))
    }

    /// Field of the incoming/sibling data, by dot-separated path.
    pub fn data_field(&self, path: &str) -> Option<&Value> {
        self.data.as_ref().and_then(|data| lookup_path(data, path))
    }

    /// Per-request lookup cache.
    pub(crate) fn lookups(&self) -> &LookupCache {
        &self.lookups
    }
}

fn lookup_path<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.')
        .try_fold(root, |value, segment| value.as_object()?.get(segment))
        .filter(|value| !value.is_null())
}
