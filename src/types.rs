/// Core domain types for schema documents, bundles, and resolution results.
use serde_json::Value;

use crate::positions::SourceMap;

/// Everything produced by one full load of a root schema document.
/// Rebuilt wholesale on every load; nothing is retained across loads.
#[derive(Debug)]
pub struct LoadedSchema {
    /// All loaded documents keyed by file basename.
    pub bundle: SchemaBundle,
    /// Basenames of every loaded file except the root, in discovery order.
    pub imported_files: Vec<String>,
    /// Basenames of files that could not be read or parsed.
    pub missing_files: Vec<String>,
    /// Dotted-path to line map built from the root document's raw text.
    pub positions: SourceMap,
    /// The parsed root document.
    pub root: Value,
}

/// Syntactic form of a `$ref` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefForm {
    /// Whole-file reference such as `address.schema.json`.
    File,
    /// File plus fragment such as `address.schema.json#/$defs/Street`.
    FileWithFragment,
    /// Local fragment such as `#/$defs/Street`.
    Local,
    /// Not a recognized reference form.
    Other,
}

impl RefForm {
    /// The display name used in `refs` listings.
    pub fn label(self) -> &'static str {
        return match self {
            RefForm::File => "file",
            RefForm::FileWithFragment => "file+fragment",
            RefForm::Local => "local",
            RefForm::Other => "other",
        };
    }
}

/// Outcome of resolving one `$ref` node. Resolution is total: every ref
/// yields either a concrete node or a missing sentinel, never an error.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved<'a> {
    /// The target could not be found; carries the original ref string
    /// so consumers can display it.
    Missing {
        /// The `$ref` value that failed to resolve.
        reference: String,
    },
    /// The resolved node, tagged when resolution crossed a file boundary.
    Node {
        /// True iff the target lives in a document other than the root.
        imported: bool,
        /// Borrowed view into the root document or the bundle.
        value: &'a Value,
    },
}

impl Resolved<'_> {
    /// The resolved value, if resolution succeeded.
    pub fn value(&self) -> Option<&Value> {
        return match self {
            Resolved::Missing { .. } => None,
            Resolved::Node { value, .. } => Some(value),
        };
    }
}

/// The complete set of schema documents loaded for one root, keyed by file
/// basename. Two same-named files in distinct directories collide; the one
/// loaded last wins.
pub type SchemaBundle = serde_json::Map<String, Value>;
