/// Crate-level error types for schemaview diagnostics.
use std::path::PathBuf;

/// All errors in schemaview carry enough context to produce a useful
/// diagnostic without a debugger. Reference resolution itself never errors
/// (it degrades to sentinels), so every variant here is a host-level failure:
/// the root document, the config file, a CLI argument, or the watcher.
#[allow(clippy::error_impl_error, reason = "crate-internal error type in binary")]
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A root schema document does not exist on disk.
    #[error("file not found: {}", path.display())]
    FileNotFound {
        /// Path to the missing document.
        path: PathBuf,
    },

    /// Underlying I/O error from the filesystem.
    #[error("io: {0}")]
    Io(
        /// The wrapped I/O error.
        #[from]
        std::io::Error,
    ),

    /// A root schema document exists but is not valid JSON.
    #[error("parse failed: {}: {reason}", file.display())]
    ParseFailed {
        /// Document that failed to parse.
        file: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// A pointer argument does not resolve inside the loaded document.
    #[error("pointer not found: `{pointer}` in {}", file.display())]
    PointerNotFound {
        /// Document the pointer was resolved against.
        file: PathBuf,
        /// The pointer string that failed to resolve.
        pointer: String,
    },

    /// TOML deserialization of the config file failed.
    #[error("toml deserialize: {0}")]
    TomlDe(
        /// The wrapped TOML deserialization error.
        #[from]
        toml::de::Error,
    ),

    /// The filesystem watcher could not be set up.
    #[error("watch failed: {reason}")]
    Watch {
        /// Description of the watcher failure.
        reason: String,
    },
}
