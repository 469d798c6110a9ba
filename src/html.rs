//! Standalone HTML export: the same sections as the terminal view, plus a
//! syntax-highlighted example value, with an embedded stylesheet.

use std::collections::HashSet;
use std::fmt::Write as _;

use regex::Regex;
use serde_json::Value;

use crate::classify;
use crate::example;
use crate::render::{RefNamePatterns, child_entries, constraint_rows, type_label};
use crate::resolver;
use crate::types::{LoadedSchema, Resolved};

/// Expansion depth past which nested nodes start collapsed.
const OPEN_DEPTH: usize = 2;

const STYLESHEET: &str = "\
body { font-family: -apple-system, 'Segoe UI', sans-serif; margin: 0; padding: 24px; background: #1e1e1e; color: #d4d4d4; }
h1 { font-size: 1.3em; border-bottom: 1px solid #3c3c3c; padding-bottom: 8px; }
.section-title { font-size: 1.1em; font-weight: 600; margin: 20px 0 8px; }
.schema-object { margin: 4px 0 4px 16px; border-left: 1px solid #3c3c3c; padding-left: 10px; }
.schema-object summary { cursor: pointer; list-style: none; }
.property-name { font-weight: 600; color: #9cdcfe; }
.property-type { font-family: monospace; color: #4ec9b0; margin-left: 8px; }
.property-description { color: #808080; margin-left: 8px; font-style: italic; }
.required-badge, .imported-badge, .missing-badge { font-size: 0.75em; border-radius: 3px; padding: 1px 5px; margin-left: 6px; }
.required-badge { background: #5a3d1e; color: #e8b174; }
.imported-badge { background: #1e3a5a; color: #74b8e8; }
.missing-badge { background: #5a1e1e; color: #e87474; }
.enum-values { font-family: monospace; color: #ce9178; }
.property-details { color: #a0a0a0; font-size: 0.85em; margin: 2px 0 2px 24px; }
.detail-label { color: #808080; }
.imported-files ul { list-style: disc; margin: 4px 0 0 20px; }
pre.example { background: #252526; border: 1px solid #3c3c3c; border-radius: 4px; padding: 12px; overflow-x: auto; }
.json-key { color: #9cdcfe; }
.json-string { color: #ce9178; }
.json-number { color: #b5cea8; }
.json-boolean { color: #569cd6; }
.json-null { color: #569cd6; }
";

/// Render a loaded schema as a self-contained HTML page.
pub fn render_html(loaded: &LoadedSchema, source_name: &str) -> String {
    let patterns = RefNamePatterns::new();
    let mut body = String::new();

    if matches!(loaded.root.get("properties"), Some(Value::Object(_))) {
        body.push_str("<div class=\"section-title\">Properties</div>\n");
        let mut visiting = HashSet::new();
        for entry in child_entries(&loaded.root) {
            if !entry.segment.starts_with("properties.") {
                continue;
            }
            node_html(&mut body, &entry.name, entry.node, entry.required, 1, loaded, &patterns, &mut visiting);
        }
    }

    definitions_html(&mut body, loaded, &patterns);
    imported_files_html(&mut body, loaded);
    example_html(&mut body, loaded);

    let title = loaded.root.get("title").and_then(Value::as_str).unwrap_or(source_name);
    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n\
         <title>Schema: {}</title>\n<style>\n{STYLESHEET}</style>\n</head>\n<body>\n\
         <h1>Schema: {}</h1>\n{body}</body>\n</html>\n",
        escape_html(title),
        escape_html(title),
    )
}

fn definitions_html(body: &mut String, loaded: &LoadedSchema, patterns: &RefNamePatterns) {
    let root = &loaded.root;
    let definitions = match (root.get("definitions"), root.get("$defs")) {
        (Some(Value::Object(entries)), _) | (_, Some(Value::Object(entries))) => entries,
        _ => return,
    };
    if definitions.is_empty() {
        return;
    }

    body.push_str("<div class=\"section-title\">Definitions</div>\n");
    let mut visiting = HashSet::new();
    for (name, definition) in definitions {
        node_html(body, name, definition, false, 1, loaded, patterns, &mut visiting);
    }
}

fn example_html(body: &mut String, loaded: &LoadedSchema) {
    let value = example::generate_example(&loaded.root, &loaded.root, &loaded.bundle);
    let Ok(pretty) = serde_json::to_string_pretty(&value) else {
        return;
    };
    body.push_str("<div class=\"section-title\">Example</div>\n");
    let _ = writeln!(body, "<pre class=\"example\">{}</pre>", syntax_highlight_json(&pretty));
}

fn imported_files_html(body: &mut String, loaded: &LoadedSchema) {
    if loaded.imported_files.is_empty() {
        return;
    }
    body.push_str("<div class=\"section-title\">Imported files</div>\n<div class=\"imported-files\"><ul>\n");
    for name in &loaded.imported_files {
        let badge = if loaded.missing_files.contains(name) {
            " <span class=\"missing-badge\">file not found</span>"
        } else {
            ""
        };
        let _ = writeln!(body, "<li>{}{badge}</li>", escape_html(name));
    }
    body.push_str("</ul></div>\n");
}

#[allow(clippy::too_many_arguments, reason = "mirrors the recursive render context")]
fn node_html(
    body: &mut String,
    name: &str,
    property: &Value,
    required: bool,
    depth: usize,
    loaded: &LoadedSchema,
    patterns: &RefNamePatterns,
    visiting: &mut HashSet<String>,
) {
    let reference = property.get("$ref").and_then(Value::as_str).map(str::to_string);
    if let Some(r) = &reference
        && visiting.contains(r)
    {
        let _ = writeln!(
            body,
            "<div class=\"schema-object\"><span class=\"property-name\">{}</span>\
             <span class=\"property-type\">{}</span> …</div>",
            escape_html(name),
            escape_html(r),
        );
        return;
    }

    let resolution = resolver::resolve_ref(property, &loaded.root, &loaded.bundle);
    let label = type_label(property, &resolution, &loaded.root, &loaded.bundle, patterns);
    let imported = matches!(resolution, Resolved::Node { imported: true, .. })
        || classify::has_remote_ref(property);

    let mut header = format!(
        "<span class=\"property-name\">{}</span><span class=\"property-type\">{}</span>",
        escape_html(name),
        escape_html(&label),
    );
    if required {
        header.push_str("<span class=\"required-badge\">required</span>");
    }
    if imported {
        header.push_str("<span class=\"imported-badge\">imported</span>");
    }

    let resolved = match &resolution {
        Resolved::Missing { .. } => {
            let _ = writeln!(
                body,
                "<div class=\"schema-object\">{header}<span class=\"missing-badge\">file not found</span></div>",
            );
            return;
        },
        Resolved::Node { value, .. } => *value,
    };

    if let Some(description) = resolved.get("description").and_then(Value::as_str) {
        let _ = write!(
            header,
            "<span class=\"property-description\">{}</span>",
            escape_html(description)
        );
    }
    if let Some(entries) = resolved.get("enum").and_then(Value::as_array) {
        let rendered: Vec<String> = entries.iter().map(Value::to_string).collect();
        let _ = write!(
            header,
            " <span class=\"enum-values\">{}</span>",
            escape_html(&rendered.join(", "))
        );
    }

    // Expandability follows nested content, not just child nodes.
    if !classify::has_nested_content(resolved) {
        let _ = writeln!(body, "<div class=\"schema-object\">{header}</div>");
        return;
    }

    let open = if depth < OPEN_DEPTH { " open" } else { "" };
    let _ = writeln!(body, "<details class=\"schema-object\"{open}><summary>{header}</summary>");

    let rows = constraint_rows(resolved);
    if !rows.is_empty() {
        body.push_str("<div class=\"property-details\">");
        for (label, value) in &rows {
            let _ = write!(
                body,
                "<div><span class=\"detail-label\">{label}:</span> {}</div>",
                escape_html(value),
            );
        }
        body.push_str("</div>\n");
    }

    if let Some(r) = &reference {
        visiting.insert(r.clone());
    }
    for entry in child_entries(resolved) {
        node_html(
            body,
            &entry.name,
            entry.node,
            entry.required,
            depth.saturating_add(1),
            loaded,
            patterns,
            visiting,
        );
    }
    if let Some(r) = &reference {
        visiting.remove(r);
    }
    body.push_str("</details>\n");
}

/// Escape text for literal inclusion in HTML.
pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Wrap JSON tokens in span tags for the embedded stylesheet. Strings
/// followed by a colon are keys; the rest are plain string values.
///
/// # Panics
///
/// Panics if the hardcoded token patterns are invalid (compile-time invariant).
pub(crate) fn syntax_highlight_json(json: &str) -> String {
    let escaped = json.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;");

    let string_pattern =
        Regex::new(r#"("(\\u[a-zA-Z0-9]{4}|\\[^u]|[^\\"])*")(\s*:)?"#).expect("valid regex");
    let highlighted = string_pattern.replace_all(&escaped, |captures: &regex::Captures<'_>| {
        let text = captures.get(0).map_or("", |m| m.as_str());
        if text.ends_with(':') {
            format!("<span class=\"json-key\">{text}</span>")
        } else {
            format!("<span class=\"json-string\">{text}</span>")
        }
    });

    let boolean_pattern = Regex::new(r"\b(true|false)\b").expect("valid regex");
    let highlighted =
        boolean_pattern.replace_all(&highlighted, "<span class=\"json-boolean\">$1</span>");

    let null_pattern = Regex::new(r"\bnull\b").expect("valid regex");
    let highlighted =
        null_pattern.replace_all(&highlighted, "<span class=\"json-null\">null</span>");

    let number_pattern =
        Regex::new(r"(?m)(^|[\s\[,:])(-?\d+(\.\d+)?([eE][+-]?\d+)?)").expect("valid regex");
    number_pattern
        .replace_all(&highlighted, "$1<span class=\"json-number\">$2</span>")
        .into_owned()
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::positions::SourceMap;
    use crate::types::SchemaBundle;

    #[test]
    fn escapes_html_metacharacters() {
        assert_eq!(escape_html("<a href=\"x\">&"), "&lt;a href=&quot;x&quot;&gt;&amp;");
    }

    #[test]
    fn highlights_keys_and_values_distinctly() {
        let highlighted = syntax_highlight_json("{\n  \"name\": \"value\"\n}");
        assert!(highlighted.contains("<span class=\"json-key\">\"name\":</span>"));
        assert!(highlighted.contains("<span class=\"json-string\">\"value\"</span>"));
    }

    #[test]
    fn highlights_literals_and_numbers() {
        let highlighted = syntax_highlight_json("[true, null, 42]");
        assert!(highlighted.contains("<span class=\"json-boolean\">true</span>"));
        assert!(highlighted.contains("<span class=\"json-null\">null</span>"));
        assert!(highlighted.contains("<span class=\"json-number\">42</span>"));
    }

    #[test]
    fn page_contains_sections_and_example() {
        let loaded = LoadedSchema {
            bundle: SchemaBundle::new(),
            imported_files: vec!["gone.json".to_string()],
            missing_files: vec!["gone.json".to_string()],
            positions: SourceMap::default(),
            root: json!({
                "title": "Person",
                "type": "object",
                "properties": {"name": {"type": "string"}}
            }),
        };

        let page = render_html(&loaded, "person.json");
        assert!(page.contains("<title>Schema: Person</title>"));
        assert!(page.contains("Properties"));
        assert!(page.contains("Imported files"));
        assert!(page.contains("file not found"));
        assert!(page.contains("json-key"));
    }
}
