//! Dirstate record types.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Size sentinel marking a file that must always be reported as modified.
///
/// Written for files taken from the other parent during a merge.
pub const SIZE_FROM_OTHER_PARENT: i64 = -2;

/// Mask applied to mode bits before comparing against the live filesystem.
pub const MODE_MASK: u32 = 0o7777;

/// Tracking state of a file, stored as a single ASCII byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileState {
    /// Tracked and unchanged since the last recorded stat (`n`).
    Normal,
    /// Scheduled for addition (`a`).
    Added,
    /// Scheduled for removal (`r`).
    Removed,
    /// Result of a 3-way merge, pending commit (`m`).
    Merged,
}

impl FileState {
    /// The on-disk tag byte.
    pub fn tag(self) -> u8 {
        match self {
            Self::Normal => b'n',
            Self::Added => b'a',
            Self::Removed => b'r',
            Self::Merged => b'm',
        }
    }

    /// Parse an on-disk tag byte.
    pub fn from_tag(byte: u8) -> Option<Self> {
        match byte {
            b'n' => Some(Self::Normal),
            b'a' => Some(Self::Added),
            b'r' => Some(Self::Removed),
            b'm' => Some(Self::Merged),
            _ => None,
        }
    }
}

impl fmt::Display for FileState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag() as char)
    }
}

/// One decoded dirstate entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Tracking state.
    pub state: FileState,
    /// POSIX mode bits recorded at last stat.
    pub mode: u32,
    /// Recorded size in bytes, or a negative sentinel.
    pub size: i64,
    /// Recorded mtime in epoch seconds; negative means unset.
    pub mtime: i32,
    /// Path relative to the repository root.
    pub path: String,
    /// Source path when this entry is a copy or rename target.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copy_source: Option<String>,
}

impl FileRecord {
    /// Create a record without a copy source.
    pub fn new(state: FileState, mode: u32, size: i64, mtime: i32, path: impl Into<String>) -> Self {
        Self {
            state,
            mode,
            size,
            mtime,
            path: path.into(),
            copy_source: None,
        }
    }

    /// Attach a copy source.
    pub fn with_copy_source(mut self, source: impl Into<String>) -> Self {
        self.copy_source = Some(source.into());
        self
    }

    /// Permission bits used when comparing against a live file.
    pub fn permission_bits(&self) -> u32 {
        self.mode & MODE_MASK
    }

    /// Whether the recorded size is the always-modified sentinel.
    pub fn is_from_other_parent(&self) -> bool {
        self.size == SIZE_FROM_OTHER_PARENT
    }

    /// Whether the recorded mtime is unset.
    pub fn mtime_unset(&self) -> bool {
        self.mtime < 0
    }
}
