//! Path canonicalization.
//!
//! Paths are normalized lexically. `..` is never resolved against a parent,
//! it rejects the whole path: the real filesystem root the caller will use is
//! unknown here, so upward resolution cannot be done soundly.

use crate::prefix::within_prefix;
use std::fmt;

/// An absolute path in canonical form: leading `/`, no empty, `.` or `..`
/// segments, no trailing `/` (except the root itself).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CanonicalPath(String);

impl CanonicalPath {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `other` is this path or lies underneath it.
    pub fn contains(&self, other: &CanonicalPath) -> bool {
        within_prefix(other.as_str(), self.as_str())
    }
}

impl fmt::Display for CanonicalPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Normalize a filesystem-style path.
///
/// Returns `None` for relative paths, paths containing NUL, and paths with a
/// `..` segment. Empty and `.` segments are dropped.
pub fn normalize_fs_path(raw: &str) -> Option<CanonicalPath> {
    if !raw.starts_with('/') || raw.contains('\0') {
        return None;
    }
    let mut parts = Vec::new();
    for segment in raw.split('/') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            _ => parts.push(segment),
        }
    }
    Some(CanonicalPath(format!("/{}", parts.join("/"))))
}

/// Like [`normalize_fs_path`], but first rejects alternate separators and
/// percent-encoded bytes. Encoded forms are never decoded.
pub fn normalize_guarded_path(raw: &str) -> Option<CanonicalPath> {
    if has_encoding_hazard(raw) {
        return None;
    }
    normalize_fs_path(raw)
}

/// A backslash or a `%XX` triplet anywhere in `raw`.
pub(crate) fn has_encoding_hazard(raw: &str) -> bool {
    raw.contains('\\') || contains_pct_triplet(raw)
}

fn contains_pct_triplet(raw: &str) -> bool {
    raw.as_bytes()
        .windows(3)
        .any(|w| w[0] == b'%' && w[1].is_ascii_hexdigit() && w[2].is_ascii_hexdigit())
}
