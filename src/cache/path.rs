//! Cache Key Normalization
//!
//! Produces platform-neutral cache keys so the same file requested through
//! different spellings maps to a single entry.

/// Normalizes a requested path into a cache key.
///
/// Semantics, identical on every platform:
/// - backslash separators are folded to forward slashes
/// - ASCII case is folded to lowercase
/// - `.` segments and empty segments (duplicate or trailing separators)
///   are dropped
///
/// `..` segments are kept verbatim; rejecting them is the gateway's job,
/// and a key must never silently alias a different path.
pub fn normalize_key(path: &str) -> String {
    let mut key = String::with_capacity(path.len());
    for segment in path.split(['/', '\\']) {
        if segment.is_empty() || segment == "." {
            continue;
        }
        if !key.is_empty() {
            key.push('/');
        }
        for c in segment.chars() {
            key.push(c.to_ascii_lowercase());
        }
    }
    key
}
