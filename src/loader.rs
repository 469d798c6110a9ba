//! Schema graph loading: discover and load every file reachable from a root
//! document through cross-file `$ref` values.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::Error;
use crate::positions::SourceMap;
use crate::resolver;
use crate::types::{LoadedSchema, SchemaBundle};

/// Loads a root schema document plus its transitive file references into a
/// closed bundle. One loader owns its bookkeeping exclusively for the
/// duration of a `load` call; callers that load concurrently use one loader
/// per in-flight document.
#[derive(Debug, Default)]
pub struct SchemaLoader {
    bundle: SchemaBundle,
    imported: Vec<PathBuf>,
    missing: Vec<PathBuf>,
    visited: HashSet<PathBuf>,
}

impl SchemaLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `root_path` and every document reachable from it.
    ///
    /// Files are fetched one at a time, depth-first, each at most once per
    /// call: reference cycles between files terminate via the visited set
    /// and are not errors. A non-root file that cannot be read or parsed
    /// joins the missing list and is not recursed from. All internal state
    /// is rebuilt on every call.
    ///
    /// # Errors
    ///
    /// Returns `Error::FileNotFound` if the root itself cannot be read, or
    /// `Error::ParseFailed` if it is not valid JSON. Failures on any other
    /// file degrade to the missing list instead.
    pub fn load(&mut self, root_path: &Path) -> Result<LoadedSchema, Error> {
        self.bundle = SchemaBundle::new();
        self.imported.clear();
        self.missing.clear();
        self.visited.clear();

        let root_path = normalize_path(root_path);
        let source = std::fs::read_to_string(&root_path)
            .map_err(|_err| Error::FileNotFound { path: root_path.clone() })?;
        let root: Value = serde_json::from_str(&source).map_err(|err| Error::ParseFailed {
            file: root_path.clone(),
            reason: err.to_string(),
        })?;

        let positions = SourceMap::build(&source);

        self.visited.insert(root_path.clone());
        self.bundle.insert(file_key(&root_path), root.clone());
        self.follow_file_refs(&collect_refs(&root), &root_path, &root_path);

        Ok(LoadedSchema {
            bundle: std::mem::take(&mut self.bundle),
            imported_files: self.imported.iter().map(|path| file_key(path)).collect(),
            missing_files: self.missing.iter().map(|path| file_key(path)).collect(),
            positions,
            root,
        })
    }

    /// Recurse into every ref that targets another file, relative to the
    /// referencing document's directory.
    fn follow_file_refs(&mut self, references: &[String], path: &Path, root_path: &Path) {
        let directory = path.parent().unwrap_or(Path::new("")).to_path_buf();
        for reference in references {
            if let Some(file_part) = resolver::file_ref_target(reference) {
                let next = normalize_path(&directory.join(file_part));
                self.visit(&next, root_path);
            }
        }
    }

    /// Load one document and recurse into its file references.
    fn visit(&mut self, path: &Path, root_path: &Path) {
        if !self.visited.insert(path.to_path_buf()) {
            return;
        }
        if path != root_path {
            self.imported.push(path.to_path_buf());
        }

        let Ok(text) = std::fs::read_to_string(path) else {
            self.missing.push(path.to_path_buf());
            return;
        };
        let Ok(document) = serde_json::from_str::<Value>(&text) else {
            self.missing.push(path.to_path_buf());
            return;
        };

        let references = collect_refs(&document);
        self.bundle.insert(file_key(path), document);
        self.follow_file_refs(&references, path, root_path);
    }
}

/// Exhaustive scan for every `$ref` string value at any nesting depth,
/// in document order. Worklist-based: nesting depth is untrusted input.
pub(crate) fn collect_refs(document: &Value) -> Vec<String> {
    let mut references = Vec::new();
    let mut stack = vec![document];
    while let Some(value) = stack.pop() {
        match value {
            Value::Array(items) => stack.extend(items.iter().rev()),
            Value::Object(members) => {
                if let Some(reference) = members.get("$ref").and_then(Value::as_str) {
                    references.push(reference.to_string());
                }
                stack.extend(members.values().rev());
            },
            _ => {},
        }
    }
    references
}

/// Basename used as the document's bundle key.
fn file_key(path: &Path) -> String {
    path.file_name().map(|name| name.to_string_lossy().into_owned()).unwrap_or_default()
}

/// Collapse `.` and `..` components lexically, without touching the
/// filesystem, so the same file reached through different relative routes
/// dedupes in the visited set. Preserves leading `..` when there is nothing
/// left to pop.
fn normalize_path(path: &Path) -> PathBuf {
    let mut components: Vec<std::path::Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            std::path::Component::CurDir => {},
            std::path::Component::ParentDir => {
                let can_pop = matches!(
                    components.last(),
                    Some(c) if !matches!(c, std::path::Component::ParentDir)
                );
                if can_pop {
                    components.pop();
                } else {
                    components.push(component);
                }
            },
            other => components.push(other),
        }
    }
    components.iter().collect()
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use std::path::Path;

    use serde_json::json;

    use super::*;
    use crate::classify;
    use crate::resolver::resolve_ref;
    use crate::types::Resolved;

    fn write(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn root_without_refs_loads_alone() {
        let dir = tempfile::tempdir().unwrap();
        let root = write(dir.path(), "root.json", r#"{"type": "object"}"#);

        let loaded = SchemaLoader::new().load(&root).unwrap();
        assert_eq!(loaded.bundle.len(), 1);
        assert!(loaded.imported_files.is_empty());
        assert!(loaded.missing_files.is_empty());
    }

    #[test]
    fn file_cycle_terminates_with_each_loaded_once() {
        let dir = tempfile::tempdir().unwrap();
        let a = write(dir.path(), "a.json", r#"{"next": {"$ref": "b.json"}}"#);
        write(dir.path(), "b.json", r#"{"back": {"$ref": "a.json"}}"#);

        let loaded = SchemaLoader::new().load(&a).unwrap();
        assert_eq!(loaded.bundle.len(), 2);
        assert_eq!(loaded.imported_files, vec!["b.json".to_string()]);
        assert!(loaded.missing_files.is_empty());
    }

    #[test]
    fn sibling_reference_is_imported_and_resolvable() {
        let dir = tempfile::tempdir().unwrap();
        let root = write(
            dir.path(),
            "root.json",
            r#"{"properties": {"addr": {"$ref": "address.json"}}}"#,
        );
        write(dir.path(), "address.json", r#"{"title": "Address"}"#);

        let loaded = SchemaLoader::new().load(&root).unwrap();
        assert_eq!(loaded.imported_files, vec!["address.json".to_string()]);
        assert!(loaded.missing_files.is_empty());
        assert_eq!(
            loaded.bundle.get("address.json").and_then(|doc| doc.get("title")),
            Some(&json!("Address"))
        );
    }

    #[test]
    fn absent_reference_is_missing_and_classifies_missing() {
        let dir = tempfile::tempdir().unwrap();
        let root = write(
            dir.path(),
            "root.json",
            r#"{"properties": {"addr": {"$ref": "address.json"}}}"#,
        );

        let loaded = SchemaLoader::new().load(&root).unwrap();
        assert_eq!(loaded.missing_files, vec!["address.json".to_string()]);

        let addr = &loaded.root["properties"]["addr"];
        let resolution = resolve_ref(addr, &loaded.root, &loaded.bundle);
        assert_eq!(classify::resolution_display_type(&resolution), "missing");
        assert_eq!(
            resolution,
            Resolved::Missing { reference: "address.json".to_string() }
        );
    }

    #[test]
    fn unreadable_root_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let absent = dir.path().join("absent.json");
        assert!(matches!(
            SchemaLoader::new().load(&absent),
            Err(Error::FileNotFound { .. })
        ));
    }

    #[test]
    fn invalid_root_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let root = write(dir.path(), "root.json", "{not json");
        assert!(matches!(
            SchemaLoader::new().load(&root),
            Err(Error::ParseFailed { .. })
        ));
    }

    #[test]
    fn refs_in_subdirectories_resolve_relative_to_referencing_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        let root = write(dir.path(), "root.json", r#"{"$ref": "nested/inner.json"}"#);
        write(dir.path().join("nested").as_path(), "inner.json", r#"{"$ref": "../peer.json"}"#);
        write(dir.path(), "peer.json", r#"{"type": "null"}"#);

        let loaded = SchemaLoader::new().load(&root).unwrap();
        assert_eq!(loaded.bundle.len(), 3);
        assert_eq!(
            loaded.imported_files,
            vec!["inner.json".to_string(), "peer.json".to_string()]
        );
    }

    #[test]
    fn collects_refs_at_any_depth_in_order() {
        let document = json!({
            "a": {"$ref": "#/first"},
            "b": {"oneOf": [{"$ref": "#/second"}, {"items": {"$ref": "#/third"}}]}
        });
        assert_eq!(collect_refs(&document), vec!["#/first", "#/second", "#/third"]);
    }

    #[test]
    fn loader_state_resets_between_loads() {
        let dir = tempfile::tempdir().unwrap();
        let root = write(dir.path(), "root.json", r#"{"$ref": "gone.json"}"#);

        let mut loader = SchemaLoader::new();
        let first = loader.load(&root).unwrap();
        assert_eq!(first.missing_files, vec!["gone.json".to_string()]);

        write(dir.path(), "gone.json", r#"{"type": "string"}"#);
        let second = loader.load(&root).unwrap();
        assert!(second.missing_files.is_empty());
        assert_eq!(second.imported_files, vec!["gone.json".to_string()]);
    }
}
