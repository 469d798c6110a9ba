//! Example-value synthesis from schema constraints.

use std::collections::HashSet;

use chrono::{SecondsFormat, Utc};
use serde_json::{Map, Value};

use crate::resolver;
use crate::types::{Resolved, SchemaBundle};

/// Placeholder for a ref re-entered during its own synthesis, and for a
/// ref whose target is missing. Keeps synthesis total and bounded.
const PLACEHOLDER: &str = "...";

/// Fixed sample for `format: uuid`.
const SAMPLE_UUID: &str = "550e8400-e29b-41d4-a716-446655440000";

/// Build a representative value conforming to a node's declared constraints.
///
/// Never fails and never recurses unboundedly: a self-referential ref
/// yields the `"..."` placeholder at the point of re-entry.
pub fn generate_example(node: &Value, root: &Value, bundle: &SchemaBundle) -> Value {
    let mut visiting = HashSet::new();
    synthesize(node, root, bundle, &mut visiting)
}

/// One synthesis step. `visiting` holds the ref strings live on the current
/// call stack; it is scoped to a single top-level call and never persisted.
fn synthesize(
    node: &Value,
    root: &Value,
    bundle: &SchemaBundle,
    visiting: &mut HashSet<String>,
) -> Value {
    if let Some(reference) = node.get("$ref").and_then(Value::as_str) {
        if visiting.contains(reference) {
            return Value::String(PLACEHOLDER.to_string());
        }
        visiting.insert(reference.to_string());
        let result = match resolver::resolve_ref(node, root, bundle) {
            Resolved::Missing { .. } => Value::String(PLACEHOLDER.to_string()),
            Resolved::Node { value, .. } => synthesize(value, root, bundle, visiting),
        };
        visiting.remove(reference);
        return result;
    }

    for keyword in ["example", "default", "const"] {
        if let Some(value) = node.get(keyword) {
            return value.clone();
        }
    }

    if let Some(first) = node.get("enum").and_then(Value::as_array).and_then(|e| e.first()) {
        return first.clone();
    }

    for keyword in ["oneOf", "anyOf"] {
        if let Some(first) = node.get(keyword).and_then(Value::as_array).and_then(|b| b.first()) {
            return synthesize(first, root, bundle, visiting);
        }
    }

    if let Some(branches) = node.get("allOf").and_then(Value::as_array)
        && !branches.is_empty()
    {
        return merge_all_of(branches, root, bundle, visiting);
    }

    let declared = match node.get("type") {
        Some(Value::Array(entries)) => entries.first().and_then(Value::as_str),
        Some(Value::String(name)) => Some(name.as_str()),
        _ => None,
    };

    match declared {
        Some("object") => synthesize_object(node, root, bundle, visiting),
        Some("array") => synthesize_array(node, root, bundle, visiting),
        Some("string") => synthesize_string(node),
        Some("number") => synthesize_numeric(node, false),
        Some("integer") => synthesize_numeric(node, true),
        Some("boolean") => Value::Bool(true),
        Some("null") => Value::Null,
        // No declared type: fall back on structure.
        _ => {
            if node.get("properties").is_some() {
                synthesize_object(node, root, bundle, visiting)
            } else if node.get("items").is_some() {
                synthesize_array(node, root, bundle, visiting)
            } else {
                Value::Null
            }
        },
    }
}

/// Shallow-merge the synthesized objects of every branch that resolves to an
/// object-shaped schema. Non-object branches contribute nothing; fields from
/// later branches overwrite earlier ones on key collision.
fn merge_all_of(
    branches: &[Value],
    root: &Value,
    bundle: &SchemaBundle,
    visiting: &mut HashSet<String>,
) -> Value {
    let mut merged = Map::new();
    for branch in branches {
        let Resolved::Node { value, .. } = resolver::resolve_ref(branch, root, bundle) else {
            continue;
        };
        if value.get("properties").is_none() {
            continue;
        }
        if let Value::Object(fields) = synthesize(value, root, bundle, visiting) {
            merged.extend(fields);
        }
    }
    Value::Object(merged)
}

fn synthesize_array(
    node: &Value,
    root: &Value,
    bundle: &SchemaBundle,
    visiting: &mut HashSet<String>,
) -> Value {
    match node.get("items") {
        None => Value::Array(Vec::new()),
        Some(items) => Value::Array(vec![synthesize(items, root, bundle, visiting)]),
    }
}

fn synthesize_numeric(node: &Value, integer: bool) -> Value {
    for bound in ["minimum", "maximum"] {
        if let Some(value) = node.get(bound) {
            return value.clone();
        }
    }
    if integer { Value::from(0) } else { Value::from(0.0) }
}

fn synthesize_object(
    node: &Value,
    root: &Value,
    bundle: &SchemaBundle,
    visiting: &mut HashSet<String>,
) -> Value {
    let mut fields = Map::new();
    if let Some(Value::Object(properties)) = node.get("properties") {
        for (name, property) in properties {
            fields.insert(name.clone(), synthesize(property, root, bundle, visiting));
        }
    }
    Value::Object(fields)
}

fn synthesize_string(node: &Value) -> Value {
    let text = match node.get("format").and_then(Value::as_str) {
        Some("date-time") => Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        Some("date") => Utc::now().format("%Y-%m-%d").to_string(),
        Some("time") => "12:00:00".to_string(),
        Some("email") => "user@example.com".to_string(),
        Some("uri" | "url") => "https://example.com".to_string(),
        Some("uuid") => SAMPLE_UUID.to_string(),
        _ => {
            let min_length = node.get("minLength").and_then(Value::as_u64).unwrap_or(0);
            if min_length > 0 {
                "x".repeat(usize::try_from(min_length).unwrap_or(0))
            } else {
                "string".to_string()
            }
        },
    };
    Value::String(text)
}
