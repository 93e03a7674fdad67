//! Error taxonomy.
//!
//! Parsing problems are deliberately *not* represented here: a malformed block
//! is recoverable, counted in [`crate::CompileMetrics`], and never escalates.
//! The variants below are the conditions that must stop a run (or, for
//! [`IntentcError::InputFileNotFound`], prevent it from starting), per the
//! propagation policy: reconciliation and I/O errors abort before any registry
//! write is attempted.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IntentcError>;

#[derive(Debug, Error)]
pub enum IntentcError {
    /// The input document does not exist. Fatal at startup.
    #[error("input file not found: {0}")]
    InputFileNotFound(PathBuf),

    /// An existing registry document failed structural validation. Fatal:
    /// reconciling against a corrupt base could destroy hand-edited content.
    #[error("registry document {path} is not a valid {kind} document: {reason}")]
    CorruptRegistry { path: PathBuf, kind: &'static str, reason: String },

    /// A filesystem operation failed. Fatal; the atomic write discipline in
    /// `registry::store` guarantees no partially written document remains.
    #[error("failed to {action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document could not be serialized before writing. Fatal.
    #[error("failed to serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl IntentcError {
    pub(crate) fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        IntentcError::Io { action, path: path.into(), source }
    }
}
