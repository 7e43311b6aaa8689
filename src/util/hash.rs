//! Stable identifiers derived from user prompts.

use sha2::{Digest, Sha256};

/// Number of hex characters kept from the prompt digest.
pub const REACTION_ID_LEN: usize = 16;

/// Derive the cache key for a reaction prompt.
///
/// The key is the first [`REACTION_ID_LEN`] lowercase hex characters of the
/// SHA-256 digest of the prompt's UTF-8 bytes. The prompt is hashed verbatim;
/// callers that want case or whitespace folding must normalize first.
#[must_use]
pub fn reaction_id(prompt: &str) -> String {
    let digest = Sha256::digest(prompt.as_bytes());
    let mut id = String::with_capacity(REACTION_ID_LEN);
    for byte in digest.iter().take(REACTION_ID_LEN / 2) {
        id.push_str(&format!("{byte:02x}"));
    }
    id
}
