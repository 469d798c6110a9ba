/// Content digests for watch-mode change suppression.
use sha2::{Digest as _, Sha256};

/// Hex SHA-256 of raw text, 64 lowercase hex chars. Watch mode compares
/// digests of the resolved bundle across reloads to skip redundant
/// re-renders on no-op filesystem events.
pub fn content_digest(text: &str) -> String {
    let hash = Sha256::digest(text.as_bytes());
    return format!("{hash:x}");
}
