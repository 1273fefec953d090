//! Error types for the dirstate codec.

use std::path::PathBuf;

/// Errors that can occur while decoding or encoding a dirstate.
///
/// Every decode variant carries the byte offset of the record that failed,
/// so corruption can be located with a hex dump.
#[derive(Debug, thiserror::Error)]
pub enum DirstateError {
    /// Fewer bytes remain than the parents block or a record header needs.
    #[error("truncated record at offset {offset}: need {needed} bytes, {remaining} remain")]
    TruncatedRecord {
        offset: u64,
        needed: usize,
        remaining: usize,
    },

    /// A record's declared name length runs past end-of-input.
    #[error("corrupt header at offset {offset}: name length {name_len} exceeds {remaining} remaining bytes")]
    CorruptHeader {
        offset: u64,
        name_len: u32,
        remaining: usize,
    },

    /// The state tag is not one of `n`, `a`, `r`, `m`.
    #[error("invalid state byte 0x{byte:02x} at offset {offset}")]
    InvalidState { offset: u64, byte: u8 },

    /// The name bytes are not valid UTF-8.
    #[error("invalid path encoding at offset {offset}")]
    InvalidPathEncoding { offset: u64 },

    /// The same path appears in two records.
    #[error("duplicate entry for {path:?} at offset {offset}")]
    DuplicateEntry { offset: u64, path: String },

    /// A record holds a value the on-disk format cannot represent.
    #[error("cannot encode {path:?}: {field} {value} out of range")]
    Unencodable {
        path: String,
        field: &'static str,
        value: i64,
    },

    /// Reading the dirstate file failed.
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl DirstateError {
    /// Byte offset of the failing record, if this is a decode error.
    pub fn offset(&self) -> Option<u64> {
        match self {
            Self::TruncatedRecord { offset, .. }
            | Self::CorruptHeader { offset, .. }
            | Self::InvalidState { offset, .. }
            | Self::InvalidPathEncoding { offset }
            | Self::DuplicateEntry { offset, .. } => Some(*offset),
            Self::Unencodable { .. } | Self::Io { .. } => None,
        }
    }
}

/// Convenience alias for dirstate results.
pub type DirstateResult<T> = Result<T, DirstateError>;
