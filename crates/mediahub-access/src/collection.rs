//! Per-collection access bundles and the policy registry.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, warn};

use crate::adapters::{DocumentAccess, FieldAccess};
use crate::context::RequestContext;
use crate::decision::AccessDecision;
use crate::operation::Operation;

/// Field-level rules for one field. Unset operations allow.
#[derive(Debug, Clone, Default)]
pub struct FieldAccessRules {
    /// Rule applied when the field is written on create.
    pub create: Option<FieldAccess>,
    /// Rule applied when the field is returned.
    pub read: Option<FieldAccess>,
    /// Rule applied when the field is written on update.
    pub update: Option<FieldAccess>,
}

impl FieldAccessRules {
    /// Empty rule set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the create rule.
    pub fn with_create(mut self, access: FieldAccess) -> Self {
        self.create = Some(access);
        self
    }

    /// Set the read rule.
    pub fn with_read(mut self, access: FieldAccess) -> Self {
        self.read = Some(access);
        self
    }

    /// Set the update rule.
    pub fn with_update(mut self, access: FieldAccess) -> Self {
        self.update = Some(access);
        self
    }

    /// Rule for an operation. Delete never has one.
    pub fn for_operation(&self, operation: Operation) -> Option<&FieldAccess> {
        if !operation.has_field_access() {
            return None;
        }
        match operation {
            Operation::Create => self.create.as_ref(),
            Operation::Read => self.read.as_ref(),
            // Only update is left once delete has been ruled out.
            _ => self.update.as_ref(),
        }
    }
}

/// Document-level rules for the four operations of one collection, plus
/// optional field-level rules.
#[derive(Debug, Clone)]
pub struct CollectionAccess {
    /// Create rule.
    pub create: DocumentAccess,
    /// Read rule.
    pub read: DocumentAccess,
    /// Update rule.
    pub update: DocumentAccess,
    /// Delete rule.
    pub delete: DocumentAccess,
    fields: HashMap<String, FieldAccessRules>,
}

impl CollectionAccess {
    /// Bundle the four document-level rules.
    pub fn new(
        create: DocumentAccess,
        read: DocumentAccess,
        update: DocumentAccess,
        delete: DocumentAccess,
    ) -> Self {
        Self {
            create,
            read,
            update,
            delete,
            fields: HashMap::new(),
        }
    }

    /// Attach field-level rules for `field`.
    pub fn with_field(mut self, field: impl Into<String>, rules: FieldAccessRules) -> Self {
        self.fields.insert(field.into(), rules);
        self
    }

    /// Field-level rules for `field`, if any.
    pub fn field(&self, field: &str) -> Option<&FieldAccessRules> {
        self.fields.get(field)
    }

    /// Document rule for an operation.
    pub fn for_operation(&self, operation: Operation) -> &DocumentAccess {
        match operation {
            Operation::Create => &self.create,
            Operation::Read => &self.read,
            Operation::Update => &self.update,
            Operation::Delete => &self.delete,
        }
    }

    /// Evaluate the document rule for `ctx.operation`.
    pub async fn evaluate(&self, ctx: &RequestContext) -> AccessDecision {
        self.for_operation(ctx.operation).evaluate(ctx).await
    }

    /// Evaluate the field rule for `field` and `ctx.operation`.
    ///
    /// Fields without a rule for the operation are allowed.
    pub async fn field_allowed(&self, field: &str, ctx: &RequestContext) -> bool {
        match self.field(field).and_then(|rules| rules.for_operation(ctx.operation)) {
            Some(access) => access.evaluate(ctx).await,
            None => true,
        }
    }

    /// Strip fields the caller may not read or write from `value`.
    ///
    /// Only top-level keys with a field rule are considered.
    pub async fn redact(&self, value: &mut Value, ctx: &RequestContext) {
        let Some(obj) = value.as_object_mut() else {
            return;
        };
        for field in self.fields.keys() {
            if obj.contains_key(field) && !self.field_allowed(field, ctx).await {
                debug!(field = %field, operation = %ctx.operation, "Field removed by access rule");
                obj.remove(field);
            }
        }
    }
}

/// Registry of collection bundles keyed by slug.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    collections: HashMap<String, CollectionAccess>,
}

impl AccessPolicy {
    /// Empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a collection's bundle.
    pub fn register(mut self, slug: impl Into<String>, access: CollectionAccess) -> Self {
        self.collections.insert(slug.into(), access);
        self
    }

    /// Bundle for `slug`.
    pub fn get(&self, slug: &str) -> Option<&CollectionAccess> {
        self.collections.get(slug)
    }

    /// Registered slugs, sorted.
    pub fn slugs(&self) -> Vec<&str> {
        let mut slugs: Vec<&str> = self.collections.keys().map(String::as_str).collect();
        slugs.sort_unstable();
        slugs
    }

    /// Evaluate document access on `slug`. Unknown collections deny.
    pub async fn evaluate(&self, slug: &str, ctx: &RequestContext) -> AccessDecision {
        match self.get(slug) {
            Some(access) => access.evaluate(ctx).await,
            None => {
                warn!(
                    collection = %slug,
                    request_id = %ctx.request_id,
                    "No access rules for collection; denying"
                );
                AccessDecision::Deny
            }
        }
    }

    /// Evaluate field access on `slug`. Unknown collections deny.
    pub async fn field_allowed(&self, slug: &str, field: &str, ctx: &RequestContext) -> bool {
        match self.get(slug) {
            Some(access) => access.field_allowed(field, ctx).await,
            None => {
                warn!(
                    collection = %slug,
                    field = %field,
                    "No access rules for collection; denying field"
                );
                false
            }
        }
    }
}
