//! Small helpers shared across commands.

use base64::{Engine, engine::general_purpose::STANDARD};
use sha2::{Digest, Sha256};

/// Normalize an alias to lowercase kebab-case.
///
/// Runs of characters outside `[a-z0-9_]` collapse into a single dash;
/// leading and trailing dashes are stripped.
pub fn normalize_alias(alias: &str) -> String {
    let mut normalized = String::with_capacity(alias.len());
    let mut last_dash = true;
    for c in alias.chars() {
        let lower = c.to_ascii_lowercase();
        if lower.is_ascii_alphanumeric() || lower == '_' {
            normalized.push(lower);
            last_dash = false;
        } else if !last_dash {
            normalized.push('-');
            last_dash = true;
        }
    }
    normalized.trim_end_matches('-').to_string()
}

/// SHA-256 digest of `content`, base64 encoded to match fetch metadata.
pub fn sha256_digest(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    STANDARD.encode(hasher.finalize())
}
