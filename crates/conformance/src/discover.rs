//! Locating vector documents on disk.

use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Directory holding capability-eval vectors, relative to the repository root.
pub const CAPABILITY_VECTORS_DIR: &str = "test-vectors/capability-eval";

/// Directory holding `valid/` and `invalid/` policy documents, relative to
/// the repository root.
pub const POLICY_DOCUMENTS_DIR: &str = "test-vectors/policy";

/// JSON and YAML files directly inside `dir`, sorted by path.
///
/// `schema.json` is skipped. A missing directory yields no documents.
pub fn discover_documents(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(Vec::new());
    }
    let mut out = Vec::new();
    for entry in std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let file_type = entry.file_type().map_err(|e| Error::io(entry.path(), e))?;
        if !file_type.is_file() {
            continue;
        }
        let path = entry.path();
        if path.file_name().is_some_and(|name| name == "schema.json") {
            continue;
        }
        let ext = path.extension().and_then(|x| x.to_str()).unwrap_or_default();
        if matches!(ext, "json" | "yaml" | "yml") {
            out.push(path);
        }
    }
    out.sort();
    Ok(out)
}

/// Walk up from `from` to the first directory containing
/// [`CAPABILITY_VECTORS_DIR`].
pub fn discover_root(from: impl AsRef<Path>) -> Result<PathBuf> {
    let from = from.as_ref();
    let mut cur = from.canonicalize().map_err(|e| Error::io(from, e))?;
    loop {
        if cur.join(CAPABILITY_VECTORS_DIR).is_dir() {
            return Ok(cur);
        }
        if !cur.pop() {
            return Err(Error::RootNotFound {
                from: from.to_path_buf(),
            });
        }
    }
}
