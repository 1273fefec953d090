//! Error types for status computation.

use std::path::PathBuf;

use hgs_dirstate::DirstateError;
use hgs_ignore::IgnoreError;

/// Fatal errors of a status run.
///
/// Per-path walk failures are not errors at this level; they are collected
/// as [`crate::PathAccessError`] diagnostics on the result.
#[derive(Debug, thiserror::Error)]
pub enum StatusError {
    /// No ancestor of the start directory contains the metadata directory.
    #[error("no repository found in '{}' ({metadata_dir} not found)", start.display())]
    RepositoryNotFound { start: PathBuf, metadata_dir: String },

    /// The dirstate could not be decoded.
    #[error("corrupt dirstate: {0}")]
    CorruptIndex(DirstateError),

    /// The ignore file could not be compiled.
    #[error("invalid ignore file: {0}")]
    InvalidIgnoreSyntax(IgnoreError),

    /// The configuration file could not be parsed.
    #[error("invalid config {}: {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// A whole-file read failed.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<DirstateError> for StatusError {
    fn from(err: DirstateError) -> Self {
        match err {
            DirstateError::Io { path, source } => Self::Io { path, source },
            other => Self::CorruptIndex(other),
        }
    }
}

impl From<IgnoreError> for StatusError {
    fn from(err: IgnoreError) -> Self {
        match err {
            IgnoreError::Io { path, source } => Self::Io { path, source },
            other => Self::InvalidIgnoreSyntax(other),
        }
    }
}

/// Convenience alias for status results.
pub type StatusResult<T> = Result<T, StatusError>;
