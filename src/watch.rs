//! File watcher: renders once on startup, then re-renders on changes.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

use notify::{RecursiveMode, Watcher as _};

use crate::config::Config;
use crate::digest;
use crate::error::Error;
use crate::loader::SchemaLoader;
use crate::render::{self, RenderOptions};

/// Debounce delay between filesystem events and re-render.
const DEBOUNCE_MS: u64 = 100;

/// Create a filesystem watcher that sends events on the given channel.
///
/// # Errors
///
/// Returns `Error::Watch` if the watcher cannot be created.
fn create_watcher(
    tx: crossbeam_channel::Sender<()>,
) -> Result<notify::RecommendedWatcher, Error> {
    return notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
        if let Ok(event) = res
            && matches!(
                event.kind,
                notify::EventKind::Create(_)
                    | notify::EventKind::Modify(_)
                    | notify::EventKind::Remove(_)
            )
        {
            let _ = tx.send(());
        }
    })
    .map_err(|e| {
        return Error::Watch {
            reason: format!("watcher setup failed: {e}"),
        };
    });
}

/// Entry point for the watch command.
///
/// Renders the schema once, then watches the root document's directory and
/// re-renders on changes. A reload that produces an identical bundle skips
/// the re-render, so editor save events that don't alter the documents stay
/// quiet. Load failures are tolerated; the document may be mid-edit.
///
/// # Errors
///
/// Returns errors from config loading or watcher setup.
pub fn run(schema: &Path) -> Result<ExitCode, Error> {
    let directory = watched_directory(schema);
    let config = Config::load(&directory)?;
    let options = RenderOptions {
        max_depth: config.max_depth,
        show_descriptions: config.show_descriptions,
        show_lines: false,
    };

    eprintln!("watch: initial render");
    let mut last_digest = render_once(schema, &options, None);

    let (tx, rx) = crossbeam_channel::unbounded();
    let mut watcher = create_watcher(tx)?;
    watcher
        .watch(&directory, RecursiveMode::Recursive)
        .map_err(|e| Error::Watch { reason: format!("cannot watch {}: {e}", directory.display()) })?;

    eprintln!("watch: monitoring {}, press Ctrl+C to stop", directory.display());

    while rx.recv().is_ok() {
        let debounce = Duration::from_millis(DEBOUNCE_MS);
        while rx.recv_timeout(debounce).is_ok() {}
        last_digest = render_once(schema, &options, last_digest.as_deref());
    }

    return Ok(ExitCode::SUCCESS);
}

/// Digest of the resolved bundle plus its missing list: the identity of
/// everything the render depends on.
fn bundle_digest(loaded: &crate::types::LoadedSchema) -> String {
    let bundle = serde_json::to_string(&loaded.bundle).unwrap_or_default();
    let missing = loaded.missing_files.join(",");
    return digest::content_digest(&format!("{bundle}\n{missing}"));
}

/// Load and re-render unless the bundle digest matches `last` (a no-op
/// filesystem event). Tolerates load failures; the document may be mid-edit.
fn render_once(schema: &Path, options: &RenderOptions, last: Option<&str>) -> Option<String> {
    let loaded = match SchemaLoader::new().load(schema) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("error: {e}");
            return None;
        },
    };

    let next_digest = bundle_digest(&loaded);
    if last == Some(next_digest.as_str()) {
        return Some(next_digest);
    }
    if last.is_some() {
        eprintln!("watch: change detected, re-rendering...");
    }

    print!("{}", render::render_tree(&loaded, options));
    if !loaded.missing_files.is_empty() {
        eprintln!("warning: {} missing file(s)", loaded.missing_files.len());
    }
    return Some(next_digest);
}

/// The directory watched for a given root: its parent, or the current
/// directory for a bare filename.
fn watched_directory(schema: &Path) -> PathBuf {
    return schema
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."))
        .to_path_buf();
}

#[cfg(test)]
#[allow(clippy::missing_panics_doc)]
mod tests {
    use std::path::Path;

    use super::watched_directory;

    #[test]
    fn bare_filename_watches_current_directory() {
        assert_eq!(watched_directory(Path::new("root.json")), Path::new("."));
        assert_eq!(
            watched_directory(Path::new("schemas/root.json")),
            Path::new("schemas")
        );
    }
}
