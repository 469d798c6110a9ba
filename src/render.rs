//! Terminal rendering of a loaded schema: Properties, Definitions, and
//! Imported-files sections with type labels, badges, and descriptions.

use std::collections::HashSet;
use std::fmt::Write as _;

use regex::Regex;
use serde_json::Value;

use crate::classify;
use crate::resolver;
use crate::types::{LoadedSchema, Resolved, SchemaBundle};

const BOLD: &str = "\x1b[1m";
const CYAN: &str = "\x1b[36m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const RESET: &str = "\x1b[0m";
const YELLOW: &str = "\x1b[33m";

/// Display settings for the tree view, merged from config and CLI flags.
pub struct RenderOptions {
    /// Maximum rendered depth; 0 means unlimited.
    pub max_depth: usize,
    /// Print property descriptions.
    pub show_descriptions: bool,
    /// Annotate nodes with source line numbers.
    pub show_lines: bool,
}

/// One renderable child of a schema node.
pub(crate) struct ChildEntry<'a> {
    /// Display name: property name, `items`, or `oneOf[0]`-style branch.
    pub name: String,
    pub node: &'a Value,
    pub required: bool,
    /// Dotted path segment under the parent, for source-line lookup.
    pub segment: String,
}

/// The children a viewer descends into: named properties (with required
/// flags), the array item schema, and composition branches.
pub(crate) fn child_entries(node: &Value) -> Vec<ChildEntry<'_>> {
    let mut children = Vec::new();
    let required: Vec<&str> = node
        .get("required")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default();

    if let Some(Value::Object(properties)) = node.get("properties") {
        for (name, property) in properties {
            children.push(ChildEntry {
                name: name.clone(),
                node: property,
                required: required.contains(&name.as_str()),
                segment: format!("properties.{name}"),
            });
        }
    }
    if let Some(items) = node.get("items") {
        children.push(ChildEntry {
            name: "items".to_string(),
            node: items,
            required: false,
            segment: "items".to_string(),
        });
    }
    for keyword in ["oneOf", "anyOf", "allOf"] {
        if let Some(branches) = node.get(keyword).and_then(Value::as_array) {
            for (index, branch) in branches.iter().enumerate() {
                children.push(ChildEntry {
                    name: format!("{keyword}[{index}]"),
                    node: branch,
                    required: false,
                    segment: format!("{keyword}.{index}"),
                });
            }
        }
    }
    children
}

/// Constraint details a viewer lists for a node, as (label, rendered value)
/// pairs in display order. String-valued `format`/`pattern` render bare;
/// everything else renders as JSON.
pub(crate) fn constraint_rows(node: &Value) -> Vec<(&'static str, String)> {
    let mut rows = Vec::new();
    for keyword in [
        "default", "example", "format", "pattern", "minimum", "maximum", "minLength",
        "maxLength", "minItems", "maxItems",
    ] {
        let Some(value) = node.get(keyword) else {
            continue;
        };
        let rendered = match value {
            Value::String(text) if matches!(keyword, "format" | "pattern") => text.clone(),
            other => other.to_string(),
        };
        rows.push((keyword, rendered));
    }
    rows
}

/// Compiled patterns for extracting a human-readable name from a ref string.
pub(crate) struct RefNamePatterns {
    defs: Regex,
    tail: Regex,
}

impl RefNamePatterns {
    /// # Panics
    ///
    /// Panics if the hardcoded patterns are invalid (compile-time invariant).
    pub fn new() -> Self {
        Self {
            defs: Regex::new(r"[#/](\$defs|definitions)/([^/]+)$").expect("valid regex"),
            tail: Regex::new(r"/([^/]+)$").expect("valid regex"),
        }
    }

    /// The `$defs`/`definitions` entry name a ref points at, falling back to
    /// the last path component. `None` when the ref has no path structure.
    pub fn ref_name<'a>(&self, reference: &'a str) -> Option<&'a str> {
        if let Some(captures) = self.defs.captures(reference) {
            return captures.get(2).map(|group| group.as_str());
        }
        self.tail.captures(reference).and_then(|captures| captures.get(1)).map(|g| g.as_str())
    }
}

/// Type label enhanced with referenced type names: `object<Department>`,
/// `array<Address>`, `object (3 properties)`.
pub(crate) fn type_label(
    property: &Value,
    resolution: &Resolved<'_>,
    root: &Value,
    bundle: &SchemaBundle,
    patterns: &RefNamePatterns,
) -> String {
    let base = classify::resolution_display_type(resolution);
    if base == "missing" {
        return base;
    }

    if let Some(reference) = property.get("$ref").and_then(Value::as_str)
        && let Some(name) = patterns.ref_name(reference)
    {
        return format!("object<{name}>");
    }

    let Some(resolved) = resolution.value() else {
        return base;
    };

    if base == "array" {
        if let Some(reference) = property
            .get("items")
            .and_then(|items| items.get("$ref"))
            .and_then(Value::as_str)
            && let Some(name) = patterns.ref_name(reference)
        {
            return format!("array<{name}>");
        }
        if let Some(items) = resolved.get("items") {
            let item_resolution = resolver::resolve_ref(items, root, bundle);
            return format!("array<{}>", classify::resolution_display_type(&item_resolution));
        }
        return base;
    }

    if base == "object"
        && let Some(Value::Object(properties)) = resolved.get("properties")
    {
        let count = properties.len();
        let noun = if count == 1 { "property" } else { "properties" };
        return format!("object ({count} {noun})");
    }

    base
}

/// Render the full tree view into a string.
pub fn render_tree(loaded: &LoadedSchema, options: &RenderOptions) -> String {
    let mut renderer = TreeRenderer {
        loaded,
        options,
        out: String::new(),
        patterns: RefNamePatterns::new(),
        visiting: HashSet::new(),
    };
    renderer.render();
    renderer.out
}

struct TreeRenderer<'a> {
    loaded: &'a LoadedSchema,
    options: &'a RenderOptions,
    out: String,
    patterns: RefNamePatterns,
    visiting: HashSet<String>,
}

impl TreeRenderer<'_> {
    fn render(&mut self) {
        let loaded = self.loaded;
        let title = loaded.root.get("title").and_then(Value::as_str).unwrap_or("root");
        let _ = writeln!(self.out, "{BOLD}{title}{RESET}");

        if matches!(loaded.root.get("properties"), Some(Value::Object(_))) {
            let _ = writeln!(self.out);
            let _ = writeln!(self.out, "{BOLD}Properties{RESET}");
            for entry in child_entries(&loaded.root) {
                if !entry.segment.starts_with("properties.") {
                    continue;
                }
                self.node(&entry.name, entry.node, entry.required, 1, &entry.segment);
            }
        }

        self.definitions();
        self.imported_files();
    }

    fn definitions(&mut self) {
        let loaded = self.loaded;
        let root = &loaded.root;
        let (defs_path, definitions) = match (root.get("definitions"), root.get("$defs")) {
            (Some(Value::Object(entries)), _) => ("definitions", entries),
            (_, Some(Value::Object(entries))) => ("$defs", entries),
            _ => return,
        };
        if definitions.is_empty() {
            return;
        }

        let _ = writeln!(self.out);
        let _ = writeln!(self.out, "{BOLD}Definitions{RESET}");
        for (name, definition) in definitions {
            self.node(name, definition, false, 1, &format!("{defs_path}.{name}"));
        }
    }

    fn imported_files(&mut self) {
        if self.loaded.imported_files.is_empty() {
            return;
        }
        let _ = writeln!(self.out);
        let _ = writeln!(self.out, "{BOLD}Imported files{RESET}");
        for name in &self.loaded.imported_files {
            if self.loaded.missing_files.contains(name) {
                let _ = writeln!(self.out, "  {name}  {RED}[file not found]{RESET}");
            } else {
                let _ = writeln!(self.out, "  {name}");
            }
        }
    }

    fn node(&mut self, name: &str, property: &Value, required: bool, depth: usize, path: &str) {
        let loaded = self.loaded;
        let indent = "  ".repeat(depth);
        let reference = property.get("$ref").and_then(Value::as_str).map(str::to_string);

        // A ref already being rendered higher up the stack: elide instead
        // of recursing forever.
        if let Some(r) = &reference
            && self.visiting.contains(r)
        {
            let _ = writeln!(self.out, "{indent}{BOLD}{name}{RESET}  {CYAN}{r}{RESET}  {DIM}…{RESET}");
            return;
        }

        let resolution = resolver::resolve_ref(property, &loaded.root, &loaded.bundle);
        let label = type_label(property, &resolution, &loaded.root, &loaded.bundle, &self.patterns);
        let imported = matches!(resolution, Resolved::Node { imported: true, .. })
            || classify::has_remote_ref(property);

        let effective_path = effective_source_path(reference.as_deref(), path);
        let mut line = format!("{indent}{BOLD}{name}{RESET}  {CYAN}{label}{RESET}");
        if required {
            let _ = write!(line, "  {YELLOW}[required]{RESET}");
        }
        if imported {
            let _ = write!(line, "  {YELLOW}[imported]{RESET}");
        }
        if let Resolved::Missing { reference: missed } = &resolution {
            let _ = write!(line, "  {RED}[file not found: {missed}]{RESET}");
        }
        if self.options.show_lines
            && let Some(row) = loaded.positions.line_for(&effective_path)
        {
            let _ = write!(line, "  {DIM}L{}{RESET}", row.saturating_add(1));
        }

        let resolved = match resolution {
            // Terminal: a missing node is displayed, never expanded.
            Resolved::Missing { .. } => {
                let _ = writeln!(self.out, "{line}");
                return;
            },
            Resolved::Node { value, .. } => value,
        };

        if self.options.show_descriptions
            && let Some(description) = resolved.get("description").and_then(Value::as_str)
        {
            let _ = write!(line, "  {DIM}{description}{RESET}");
        }
        let _ = writeln!(self.out, "{line}");

        if classify::has_nested_content(resolved) {
            if let Some(entries) = resolved.get("enum").and_then(Value::as_array) {
                let rendered: Vec<String> = entries.iter().map(Value::to_string).collect();
                let _ = writeln!(self.out, "{indent}  {DIM}enum: {}{RESET}", rendered.join(", "));
            }
            let rows = constraint_rows(resolved);
            if !rows.is_empty() {
                let rendered: Vec<String> =
                    rows.iter().map(|(label, value)| format!("{label}: {value}")).collect();
                let _ = writeln!(self.out, "{indent}  {DIM}{}{RESET}", rendered.join(", "));
            }
        }

        let children = child_entries(resolved);
        if children.is_empty() {
            return;
        }
        if self.options.max_depth > 0 && depth >= self.options.max_depth {
            let _ = writeln!(self.out, "{indent}  {DIM}…{RESET}");
            return;
        }

        if let Some(r) = &reference {
            self.visiting.insert(r.clone());
        }
        for entry in children {
            let child_path = format!("{effective_path}.{}", entry.segment);
            self.node(&entry.name, entry.node, entry.required, depth.saturating_add(1), &child_path);
        }
        if let Some(r) = &reference {
            self.visiting.remove(r);
        }
    }
}

/// Source-line lookups for a ref node use the target definition's path
/// (`#/$defs/Department` → `$defs.Department`); everything else uses the
/// node's own document path.
fn effective_source_path(reference: Option<&str>, path: &str) -> String {
    if let Some(reference) = reference
        && let Some((_, fragment)) = reference.split_once("#/")
    {
        return fragment.replace('/', ".");
    }
    path.to_string()
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::positions::SourceMap;

    fn loaded_from(root: serde_json::Value) -> LoadedSchema {
        LoadedSchema {
            bundle: SchemaBundle::new(),
            imported_files: Vec::new(),
            missing_files: Vec::new(),
            positions: SourceMap::default(),
            root,
        }
    }

    fn plain_options() -> RenderOptions {
        RenderOptions { max_depth: 0, show_descriptions: true, show_lines: false }
    }

    #[test]
    fn renders_properties_with_badges() {
        let loaded = loaded_from(json!({
            "title": "Person",
            "type": "object",
            "required": ["name"],
            "properties": {
                "name": {"type": "string", "description": "Full name"},
                "age": {"type": "integer"}
            }
        }));

        let out = render_tree(&loaded, &plain_options());
        assert!(out.contains("Person"));
        assert!(out.contains("name"));
        assert!(out.contains("[required]"));
        assert!(out.contains("Full name"));
        assert!(out.contains("age"));
    }

    #[test]
    fn missing_ref_is_terminal_with_carried_ref_string() {
        let loaded = loaded_from(json!({
            "properties": {"addr": {"$ref": "address.json"}}
        }));

        let out = render_tree(&loaded, &plain_options());
        assert!(out.contains("[file not found: address.json]"));
    }

    #[test]
    fn self_referential_definitions_render_bounded() {
        let loaded = loaded_from(json!({
            "$defs": {
                "Node": {
                    "type": "object",
                    "properties": {"child": {"$ref": "#/$defs/Node"}}
                }
            }
        }));

        let out = render_tree(&loaded, &plain_options());
        assert!(out.contains("Definitions"));
        assert!(out.contains("…"));
    }

    #[test]
    fn ref_names_extract_from_defs_and_tails() {
        let patterns = RefNamePatterns::new();
        assert_eq!(patterns.ref_name("#/$defs/Department"), Some("Department"));
        assert_eq!(patterns.ref_name("other.json#/definitions/Email"), Some("Email"));
        assert_eq!(patterns.ref_name("address.json"), None);
    }

    #[test]
    fn depth_limit_elides_children() {
        let loaded = loaded_from(json!({
            "properties": {
                "outer": {"type": "object", "properties": {"inner": {"type": "string"}}}
            }
        }));

        let options = RenderOptions { max_depth: 1, show_descriptions: true, show_lines: false };
        let out = render_tree(&loaded, &options);
        assert!(out.contains("outer"));
        assert!(!out.contains("inner"));
    }
}
