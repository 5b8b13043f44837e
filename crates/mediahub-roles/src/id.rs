//! Identifier normalization
//!
//! Relationship fields on CMS documents arrive either as a raw id
//! (`"u1"`, `42`) or as the expanded related document (`{"id": "u1", ...}`),
//! depending on query depth. Every identity comparison in the access layer
//! goes through [`canonical_id`] so both shapes compare equal.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reduce an id-bearing value to its canonical string form.
///
/// Accepts a non-empty string, a number, or an object whose `id` property is
/// one of those. Anything else (null, empty string, arrays, objects without a
/// usable `id`) yields `None`, which callers treat as "cannot prove identity".
///
/// # Examples
///
/// ```
/// use mediahub_roles::canonical_id;
/// use serde_json::json;
///
/// assert_eq!(canonical_id(&json!("u1")), Some("u1".to_string()));
/// assert_eq!(canonical_id(&json!({"id": "u1", "email": "a@b.c"})), Some("u1".to_string()));
/// assert_eq!(canonical_id(&json!(42)), Some("42".to_string()));
/// assert_eq!(canonical_id(&json!(null)), None);
/// ```
pub fn canonical_id(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => map.get("id").and_then(scalar_id),
        other => scalar_id(other),
    }
}

fn scalar_id(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Serde helper: deserialize a required id that may be a string or number.
pub(crate) fn deserialize_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    canonical_id(&value)
        .ok_or_else(|| serde::de::Error::custom("expected a non-empty string or numeric id"))
}

/// Serde helper: deserialize an optional id in any accepted shape.
pub(crate) fn deserialize_optional_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(canonical_id))
}
