//! Error types for the ignore compiler.

use std::path::PathBuf;

/// Errors that can occur while reading or compiling an ignore file.
#[derive(Debug, thiserror::Error)]
pub enum IgnoreError {
    /// A `syntax:` line named an unsupported syntax.
    #[error("{}:{line}: invalid syntax '{syntax}'", file.display())]
    InvalidSyntaxDirective {
        file: PathBuf,
        line: usize,
        syntax: String,
    },

    /// A pattern did not compile to a valid regular expression.
    #[error("{}:{line}: invalid pattern '{pattern}': {source}", file.display())]
    InvalidPattern {
        file: PathBuf,
        line: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Reading the ignore file failed.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias for ignore results.
pub type IgnoreResult<T> = Result<T, IgnoreError>;
