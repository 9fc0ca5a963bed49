//! Stable content fingerprinting for cache keys.

use sha2::{Digest, Sha256};

/// SHA-256 hex digest of the message text.
///
/// Stable across processes, so the same message always maps to the same
/// cache slot.
pub fn fingerprint(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
