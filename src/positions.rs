//! Source-position indexing: dotted document paths to line numbers.

use std::collections::HashMap;

use tree_sitter::{Node, Parser};

/// Immutable map from a dotted path of property names and indices
/// (`"properties.addr"`, `"oneOf.1"`) to the zero-based line where the
/// value starts in the raw source text. Built once per load; consumers
/// use it for navigation metadata only.
#[derive(Debug, Default)]
pub struct SourceMap {
    lines: HashMap<String, usize>,
}

impl SourceMap {
    /// Parse raw JSON text position-aware and index every object member
    /// and array element. Unparsable text degrades to an empty map;
    /// navigation is lost, loading is not.
    pub fn build(source: &str) -> Self {
        let mut parser = Parser::new();
        let language = tree_sitter_json::LANGUAGE.into();
        if parser.set_language(&language).is_err() {
            return Self::default();
        }
        let Some(tree) = parser.parse(source, None) else {
            return Self::default();
        };

        let mut lines = HashMap::new();
        let document = tree.root_node();
        let mut cursor = document.walk();
        let root_value = document
            .named_children(&mut cursor)
            .find(|child| child.kind() != "ERROR");
        if let Some(root_value) = root_value {
            index_values(root_value, source, &mut lines);
        }
        Self { lines }
    }

    /// Zero-based line of the value at a dotted path, if indexed.
    pub fn line_for(&self, path: &str) -> Option<usize> {
        self.lines.get(path).copied()
    }
}

/// Walk the parsed tree with an explicit worklist (document nesting depth is
/// untrusted input) and record each value's starting row under its path.
/// The root value is keyed by the empty path at line 0.
fn index_values(root_value: Node<'_>, source: &str, lines: &mut HashMap<String, usize>) {
    let mut stack = vec![(root_value, String::new())];
    while let Some((node, path)) = stack.pop() {
        let line = if path.is_empty() { 0 } else { node.start_position().row };
        lines.insert(path.clone(), line);

        match node.kind() {
            "object" => {
                let mut cursor = node.walk();
                for member in node.named_children(&mut cursor) {
                    if member.kind() != "pair" {
                        continue;
                    }
                    let Some(key) = member.child_by_field_name("key") else {
                        continue;
                    };
                    let Some(value) = member.child_by_field_name("value") else {
                        continue;
                    };
                    let Some(name) = key_text(key, source) else {
                        continue;
                    };
                    stack.push((value, join_path(&path, &name)));
                }
            },
            "array" => {
                let mut cursor = node.walk();
                for (index, element) in node.named_children(&mut cursor).enumerate() {
                    stack.push((element, join_path(&path, &index.to_string())));
                }
            },
            _ => {},
        }
    }
}

fn join_path(parent: &str, segment: &str) -> String {
    if parent.is_empty() {
        segment.to_string()
    } else {
        format!("{parent}.{segment}")
    }
}

/// Member key text with the surrounding quotes stripped.
fn key_text(key: Node<'_>, source: &str) -> Option<String> {
    let raw = key.utf8_text(source.as_bytes()).ok()?;
    Some(raw.trim_matches('"').to_string())
}
