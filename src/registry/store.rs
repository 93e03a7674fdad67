//! Registry document persistence.
//!
//! Each document is read once per run, mutated in memory, and rewritten once.
//! The rewrite goes through a temporary file in the target directory followed
//! by a rename, so a crash mid-write leaves the document at either its
//! pre-run or its fully-reconciled content, never in between.
//!
//! A missing document is not an error: it is bootstrapped from the type's
//! default skeleton (and an empty file counts as missing). An existing
//! document that fails structural validation is fatal before any write.

use crate::error::{IntentcError, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::io::Write;
use std::path::Path;
use tracing::info;

/// Load `path` as a `T`, or return the default skeleton when the file is
/// absent or empty.
pub(crate) fn load_or_bootstrap<T>(path: &Path, kind: &'static str) -> Result<T>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        info!(path = %path.display(), kind, "registry document missing; bootstrapping skeleton");
        return Ok(T::default());
    }

    let content = std::fs::read_to_string(path).map_err(|e| IntentcError::io("read", path, e))?;
    if content.trim().is_empty() {
        return Ok(T::default());
    }

    serde_yaml::from_str(&content).map_err(|e| IntentcError::CorruptRegistry {
        path: path.to_path_buf(),
        kind,
        reason: e.to_string(),
    })
}

/// Serialize `document` and atomically replace `path` with it.
pub(crate) fn save<T: Serialize>(document: &T, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(document)
        .map_err(|e| IntentcError::Serialize { path: path.to_path_buf(), source: e })?;

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(|e| IntentcError::io("create directory", parent, e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(|e| IntentcError::io("create temp file in", parent, e))?;
    tmp.write_all(yaml.as_bytes()).map_err(|e| IntentcError::io("write", path, e))?;
    tmp.flush().map_err(|e| IntentcError::io("flush", path, e))?;
    tmp.persist(path).map_err(|e| IntentcError::io("replace", path, e.error))?;

    Ok(())
}
