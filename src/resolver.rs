use serde_json::Value;

use crate::types::{RefForm, Resolved, SchemaBundle};

/// Substring that marks the file portion of a ref as a cross-file reference.
const FILE_MARKER: &str = ".json";

/// A file reference followed by a fragment, e.g. `other.schema.json#/$defs/X`.
const FILE_FRAGMENT_MARKER: &str = ".json#/";

/// Final component of a posix- or windows-style path string.
pub(crate) fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

/// The file portion of a ref that targets another document, if any.
/// Local fragments (`#/...`) and unrecognized strings yield `None`.
pub(crate) fn file_ref_target(reference: &str) -> Option<&str> {
    let file_part = reference.split('#').next().unwrap_or(reference);
    if file_part.contains(FILE_MARKER) {
        Some(file_part)
    } else {
        None
    }
}

/// Classify the syntactic form of a `$ref` string.
pub fn ref_form(reference: &str) -> RefForm {
    if reference.contains(FILE_FRAGMENT_MARKER) {
        RefForm::FileWithFragment
    } else if reference.contains(FILE_MARKER) {
        RefForm::File
    } else if reference.starts_with("#/") {
        RefForm::Local
    } else {
        RefForm::Other
    }
}

/// Resolve one `$ref` node against the root document in scope and the bundle.
///
/// `root` is whichever document the fragment should be walked against; for
/// refs nested inside a cross-file schema that is the external document, not
/// the original root. Pure and total: a node without a recognized ref form
/// comes back unchanged, and any unresolvable target comes back as
/// [`Resolved::Missing`] carrying the original ref string. Crossing a file
/// boundary tags the result as imported; the bundle is never mutated.
pub fn resolve_ref<'a>(node: &'a Value, root: &'a Value, bundle: &'a SchemaBundle) -> Resolved<'a> {
    let Some(reference) = node.get("$ref").and_then(Value::as_str) else {
        return Resolved::Node { imported: false, value: node };
    };

    // File plus fragment: look up the basename, then walk into the
    // external document.
    if reference.contains(FILE_FRAGMENT_MARKER) {
        let (file_part, fragment) = reference.split_once('#').unwrap_or((reference, ""));
        let Some(external) = bundle.get(basename(file_part)) else {
            return missing(reference);
        };
        return match walk_fragment(external, fragment) {
            None => missing(reference),
            Some(value) => Resolved::Node { imported: true, value },
        };
    }

    // Whole-file reference.
    if reference.contains(FILE_MARKER) {
        let file_part = reference.split('#').next().unwrap_or(reference);
        return match bundle.get(basename(file_part)) {
            None => missing(reference),
            Some(value) => Resolved::Node { imported: true, value },
        };
    }

    // Local fragment, walked against the root currently in scope.
    if reference.starts_with("#/") {
        let fragment = reference.trim_start_matches('#');
        return match walk_fragment(root, fragment) {
            None => missing(reference),
            Some(value) => Resolved::Node { imported: false, value },
        };
    }

    // Not a recognized ref form.
    Resolved::Node { imported: false, value: node }
}

fn missing<'a>(reference: &str) -> Resolved<'a> {
    Resolved::Missing { reference: reference.to_string() }
}

/// Walk `/`-separated fragment segments through a document as successive
/// key or index lookups. The fragment starts with `/`, so the leading empty
/// segment is dropped.
fn walk_fragment<'a>(document: &'a Value, fragment: &str) -> Option<&'a Value> {
    let mut current = document;
    for segment in fragment.split('/').skip(1) {
        current = match current {
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            Value::Object(members) => members.get(segment)?,
            _ => return None,
        };
    }
    Some(current)
}
