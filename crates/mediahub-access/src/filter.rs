//! # Row filters
//!
//! Declarative query constraints returned in place of a boolean when access
//! depends on which document is being touched ("you may read your own
//! orders"). The access layer only builds these; the host's query layer
//! applies them.

use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

/// A where-clause over document fields.
///
/// Serializes to the host's JSON query shape:
///
/// ```text
/// Equals          {"owner": {"equals": "u1"}}
/// LessThanEqual   {"publishedAt": {"less_than_equal": "2024-01-01T00:00:00Z"}}
/// And / Or        {"and": [ ... ]}
/// ```
///
/// # Example
///
/// ```
/// use mediahub_access::Where;
/// use serde_json::json;
///
/// let filter = Where::equals("owner", "u1").and(Where::equals("_status", "published"));
/// assert_eq!(
///     filter.to_json(),
///     json!({"and": [
///         {"owner": {"equals": "u1"}},
///         {"_status": {"equals": "published"}}
///     ]})
/// );
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum Where {
    /// Field equals value.
    Equals {
        /// Field path (dot separated).
        field: String,
        /// Expected value.
        value: Value,
    },

    /// Field is less than or equal to value.
    LessThanEqual {
        /// Field path (dot separated).
        field: String,
        /// Upper bound.
        value: Value,
    },

    /// All clauses hold.
    And(Vec<Where>),

    /// At least one clause holds.
    Or(Vec<Where>),
}

impl Where {
    /// `field` equals `value`.
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Where::Equals {
            field: field.into(),
            value: value.into(),
        }
    }

    /// `field` is at most `value`.
    pub fn less_than_equal(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Where::LessThanEqual {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Conjunction; nested `And`s are flattened.
    pub fn and(self, other: Where) -> Self {
        let mut clauses = match self {
            Where::And(clauses) => clauses,
            single => vec![single],
        };
        match other {
            Where::And(more) => clauses.extend(more),
            single => clauses.push(single),
        }
        Where::And(clauses)
    }

    /// Disjunction; nested `Or`s are flattened.
    pub fn or(self, other: Where) -> Self {
        let mut clauses = match self {
            Where::Or(clauses) => clauses,
            single => vec![single],
        };
        match other {
            Where::Or(more) => clauses.extend(more),
            single => clauses.push(single),
        }
        Where::Or(clauses)
    }

    /// Render as the host's JSON where-clause.
    pub fn to_json(&self) -> Value {
        match self {
            Where::Equals { field, value } => constraint(field, "equals", value.clone()),
            Where::LessThanEqual { field, value } => {
                constraint(field, "less_than_equal", value.clone())
            }
            Where::And(clauses) => json!({ "and": clauses_json(clauses) }),
            Where::Or(clauses) => json!({ "or": clauses_json(clauses) }),
        }
    }
}

fn constraint(field: &str, operator: &str, value: Value) -> Value {
    let mut op = Map::new();
    op.insert(operator.to_string(), value);
    let mut clause = Map::new();
    clause.insert(field.to_string(), Value::Object(op));
    Value::Object(clause)
}

fn clauses_json(clauses: &[Where]) -> Vec<Value> {
    clauses.iter().map(Where::to_json).collect()
}

impl Serialize for Where {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}
