//! Display-type classification for schema nodes.

use serde_json::Value;

use crate::resolver;
use crate::types::Resolved;

/// Keywords whose presence means a node has something to expand into.
const NESTED_CONTENT_KEYWORDS: [&str; 15] = [
    "properties",
    "items",
    "oneOf",
    "anyOf",
    "allOf",
    "description",
    "enum",
    "default",
    "example",
    "format",
    "pattern",
    "minimum",
    "maximum",
    "minLength",
    "maxLength",
];

/// Derive the display-type tag for a schema node.
///
/// Priority: `$ref` wins over a declared `type`; a `type` list is joined
/// with `" | "`; composition keywords come before the structural fallbacks.
pub fn display_type(node: &Value) -> String {
    if node.get("$ref").is_some() {
        return "ref".to_string();
    }
    if let Some(declared) = node.get("type") {
        return match declared {
            Value::Array(entries) => entries
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(" | "),
            Value::String(name) => name.clone(),
            _ => "any".to_string(),
        };
    }
    if node.get("enum").is_some() {
        return "enum".to_string();
    }
    for keyword in ["oneOf", "anyOf", "allOf"] {
        if node.get(keyword).is_some() {
            return keyword.to_string();
        }
    }
    if node.get("properties").is_some() {
        return "object".to_string();
    }
    if node.get("items").is_some() {
        return "array".to_string();
    }
    "any".to_string()
}

/// True iff a node carries anything a viewer would expand: children,
/// composition branches, or displayable constraints.
pub fn has_nested_content(node: &Value) -> bool {
    match node {
        Value::Object(members) => NESTED_CONTENT_KEYWORDS
            .iter()
            .any(|keyword| members.contains_key(*keyword)),
        _ => false,
    }
}

/// Deep scan for any `$ref` whose value targets another file, at any
/// nesting depth. Used to badge cross-file provenance even when the
/// immediate node is not itself a ref (e.g. reached through `allOf`).
pub fn has_remote_ref(node: &Value) -> bool {
    let mut stack = vec![node];
    while let Some(value) = stack.pop() {
        match value {
            Value::Array(items) => stack.extend(items),
            Value::Object(members) => {
                if let Some(reference) = members.get("$ref").and_then(Value::as_str)
                    && resolver::file_ref_target(reference).is_some()
                {
                    return true;
                }
                stack.extend(members.values());
            },
            _ => {},
        }
    }
    false
}

/// Display type of a resolution outcome. A missing sentinel is terminal:
/// consumers must not expand it further, only display its ref string.
pub fn resolution_display_type(resolution: &Resolved<'_>) -> String {
    match resolution {
        Resolved::Missing { .. } => "missing".to_string(),
        Resolved::Node { value, .. } => display_type(value),
    }
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn ref_wins_over_type() {
        assert_eq!(display_type(&json!({"$ref": "#/$defs/X", "type": "object"})), "ref");
    }

    #[test]
    fn type_list_joins_with_pipes() {
        assert_eq!(display_type(&json!({"type": ["string", "null"]})), "string | null");
    }

    #[test]
    fn keyword_priority_over_structure() {
        assert_eq!(display_type(&json!({"enum": [1, 2]})), "enum");
        assert_eq!(display_type(&json!({"oneOf": []})), "oneOf");
        assert_eq!(display_type(&json!({"properties": {}})), "object");
        assert_eq!(display_type(&json!({"items": {}})), "array");
        assert_eq!(display_type(&json!({})), "any");
    }

    #[test]
    fn missing_resolution_classifies_missing() {
        let resolution = Resolved::Missing { reference: "gone.json".to_string() };
        assert_eq!(resolution_display_type(&resolution), "missing");
    }

    #[test]
    fn nested_content_detects_constraints() {
        assert!(has_nested_content(&json!({"minLength": 3})));
        assert!(has_nested_content(&json!({"description": "a field"})));
        assert!(!has_nested_content(&json!({"type": "string"})));
        assert!(!has_nested_content(&json!("scalar")));
    }

    #[test]
    fn remote_ref_found_through_all_of() {
        let node = json!({
            "allOf": [
                {"type": "object"},
                {"properties": {"addr": {"$ref": "address.json#/$defs/Street"}}}
            ]
        });
        assert!(has_remote_ref(&node));
        assert!(!has_remote_ref(&json!({"$ref": "#/$defs/Local"})));
    }
}
