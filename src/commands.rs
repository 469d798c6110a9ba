//! Core CLI commands for schemaview: view, check, example, refs, render.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use walkdir::WalkDir;

use crate::config::Config;
use crate::error::Error;
use crate::example;
use crate::html;
use crate::loader::{self, SchemaLoader};
use crate::render::{self, RenderOptions};
use crate::resolver;
use crate::types::{RefForm, Resolved};

/// Load every given root and verify that all discovered refs resolve.
///
/// Reports `MISSING` for files that could not be read or parsed and
/// `UNRESOLVED` for refs whose target file loaded but whose fragment walks
/// off the document. A directory target is swept for `*.json` roots.
///
/// Exit code priority: missing files (2) > unresolved refs (1) > clean (0).
///
/// # Errors
///
/// Returns errors from loading a single explicit root; in directory mode a
/// root that fails to load is reported and counted instead.
pub fn check(target: &Path) -> Result<ExitCode, Error> {
    let roots = collect_schema_roots(target)?;
    let sweep = roots.len() > 1;
    let mut loader = SchemaLoader::new();
    let mut missing_count = 0_u32;
    let mut unresolved_count = 0_u32;
    let mut total_refs = 0_u32;
    let mut file_count = 0_u32;

    for root_path in &roots {
        let loaded = match loader.load(root_path) {
            Ok(loaded) => loaded,
            Err(e) if sweep => {
                // The engine's taxonomy merges unreadable and unparsable
                // into one "missing" outcome; a swept root gets the same.
                missing_count = missing_count.saturating_add(1);
                println!("MISSING     {}  ({e})", root_path.display());
                continue;
            },
            Err(e) => return Err(e),
        };
        file_count = file_count.saturating_add(1);

        for name in &loaded.missing_files {
            missing_count = missing_count.saturating_add(1);
            println!("MISSING     {}: {name}", root_path.display());
        }

        for (file_key, document) in &loaded.bundle {
            for reference in loader::collect_refs(document) {
                total_refs = total_refs.saturating_add(1);

                // Refs into files already reported missing are not
                // double-counted as unresolved.
                if let Some(file_part) = resolver::file_ref_target(&reference)
                    && loaded.missing_files.iter().any(|m| m == resolver::basename(file_part))
                {
                    continue;
                }

                let node = serde_json::json!({ "$ref": reference });
                if matches!(
                    resolver::resolve_ref(&node, document, &loaded.bundle),
                    Resolved::Missing { .. }
                ) {
                    unresolved_count = unresolved_count.saturating_add(1);
                    println!("UNRESOLVED  {file_key}: {reference}");
                }
            }
        }
    }

    // Exit code priority: missing (2) > unresolved (1) > clean (0).
    if missing_count > 0 {
        println!();
        println!("{missing_count} missing, {unresolved_count} unresolved");
        return Ok(ExitCode::from(2));
    } else if unresolved_count > 0 {
        println!();
        println!("{unresolved_count} unresolved");
        return Ok(ExitCode::from(1));
    } else {
        println!("All {total_refs} references resolved across {file_count} root(s)");
        return Ok(ExitCode::SUCCESS);
    }
}

/// Resolve a check target to its list of root documents.
///
/// # Errors
///
/// Returns `Error::FileNotFound` if the target does not exist.
fn collect_schema_roots(target: &Path) -> Result<Vec<PathBuf>, Error> {
    if target.is_dir() {
        let mut roots: Vec<PathBuf> = WalkDir::new(target)
            .into_iter()
            .filter_map(Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "json"))
            .map(|entry| entry.path().to_path_buf())
            .collect();
        roots.sort();
        return Ok(roots);
    }
    if !target.exists() {
        return Err(Error::FileNotFound { path: target.to_path_buf() });
    }
    return Ok(vec![target.to_path_buf()]);
}

/// Print the synthesized example value for the root document, or for a
/// pointer within the loaded bundle.
///
/// # Errors
///
/// Returns errors from loading the root, or `Error::PointerNotFound` if the
/// pointer argument does not resolve.
pub fn example(schema: &Path, pointer: Option<&str>) -> Result<(), Error> {
    let loaded = SchemaLoader::new().load(schema)?;

    let value = match pointer {
        None => example::generate_example(&loaded.root, &loaded.root, &loaded.bundle),
        Some(pointer) => {
            if matches!(resolver::ref_form(pointer), RefForm::Other) {
                return Err(Error::PointerNotFound {
                    file: schema.to_path_buf(),
                    pointer: pointer.to_string(),
                });
            }
            let node = serde_json::json!({ "$ref": pointer });
            match resolver::resolve_ref(&node, &loaded.root, &loaded.bundle) {
                Resolved::Missing { reference } => {
                    return Err(Error::PointerNotFound {
                        file: schema.to_path_buf(),
                        pointer: reference,
                    });
                },
                Resolved::Node { value, .. } => {
                    example::generate_example(value, &loaded.root, &loaded.bundle)
                },
            }
        },
    };

    println!("{}", serde_json::to_string_pretty(&value).unwrap_or_default());
    return Ok(());
}

/// List every `$ref` in the loaded bundle with its form and status.
///
/// # Errors
///
/// Returns errors from loading the root.
pub fn refs(schema: &Path) -> Result<(), Error> {
    let loaded = SchemaLoader::new().load(schema)?;

    for (file_key, document) in &loaded.bundle {
        for reference in loader::collect_refs(document) {
            let form = resolver::ref_form(&reference);
            let node = serde_json::json!({ "$ref": reference });
            let status = match resolver::resolve_ref(&node, document, &loaded.bundle) {
                Resolved::Missing { .. } => "missing",
                Resolved::Node { imported: true, .. } => "ok (imported)",
                Resolved::Node { .. } => "ok",
            };
            println!("{file_key}  {reference}  [{}] {status}", form.label());
        }
    }
    return Ok(());
}

/// Export a standalone HTML page for the schema.
///
/// # Errors
///
/// Returns errors from loading the root or writing the output file.
pub fn render(schema: &Path, output: &Path) -> Result<(), Error> {
    let loaded = SchemaLoader::new().load(schema)?;
    let source_name = schema
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let page = html::render_html(&loaded, &source_name);
    std::fs::write(output, page)?;
    eprintln!("Wrote {}", output.display());
    return Ok(());
}

/// Render the schema tree to the terminal.
///
/// # Errors
///
/// Returns errors from config loading or from loading the root.
pub fn view(
    schema: &Path,
    depth: Option<usize>,
    no_descriptions: bool,
    lines: bool,
) -> Result<(), Error> {
    let directory = schema.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let config = Config::load(directory)?;
    let loaded = SchemaLoader::new().load(schema)?;

    let options = RenderOptions {
        max_depth: depth.unwrap_or(config.max_depth),
        show_descriptions: !no_descriptions && config.show_descriptions,
        show_lines: lines,
    };
    print!("{}", render::render_tree(&loaded, &options));
    return Ok(());
}
