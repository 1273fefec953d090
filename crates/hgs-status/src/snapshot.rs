//! Live filesystem snapshot of the working tree.
//!
//! A single recursive walk records the metadata of every non-directory entry
//! below the repository root, skipping the top-level metadata directory.
//! Symlinks are not followed. Entries that cannot be read are recorded as
//! [`PathAccessError`]s and the walk carries on.

use std::collections::BTreeMap;
use std::fs::Metadata;
use std::io;
use std::path::Path;
use std::time::UNIX_EPOCH;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Metadata of one live file.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveEntry {
    /// Path relative to the repository root, `/`-separated.
    pub path: String,
    pub size: u64,
    /// POSIX mode bits.
    pub mode: u32,
    /// Modification time truncated to whole epoch seconds.
    pub mtime: i64,
    pub is_symlink: bool,
}

impl LiveEntry {
    /// Build from `lstat`-style metadata.
    pub fn from_metadata(path: impl Into<String>, meta: &Metadata) -> io::Result<Self> {
        let modified = meta.modified()?;
        let mtime = match modified.duration_since(UNIX_EPOCH) {
            Ok(d) => d.as_secs() as i64,
            Err(e) => -(e.duration().as_secs_f64().ceil() as i64),
        };
        Ok(Self {
            path: path.into(),
            size: meta.len(),
            mode: mode_bits(meta),
            mtime,
            is_symlink: meta.file_type().is_symlink(),
        })
    }

    /// Permission bits, comparable with a dirstate record's.
    pub fn permission_bits(&self) -> u32 {
        self.mode & hgs_dirstate::MODE_MASK
    }
}

#[cfg(unix)]
fn mode_bits(meta: &Metadata) -> u32 {
    use std::os::unix::fs::PermissionsExt;
    meta.permissions().mode()
}

#[cfg(not(unix))]
fn mode_bits(meta: &Metadata) -> u32 {
    if meta.permissions().readonly() {
        0o100444
    } else {
        0o100644
    }
}

/// Why a path could not be read during the walk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessErrorKind {
    PermissionDenied,
    /// The entry disappeared between listing and stat.
    Vanished,
    /// The file name is not valid UTF-8.
    InvalidName,
    Other,
}

impl AccessErrorKind {
    fn from_io(kind: io::ErrorKind) -> Self {
        match kind {
            io::ErrorKind::PermissionDenied => Self::PermissionDenied,
            io::ErrorKind::NotFound => Self::Vanished,
            _ => Self::Other,
        }
    }
}

/// A path that could not be read. Degrades that path's classification only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{path}: {message}")]
pub struct PathAccessError {
    /// Repository-relative path, or the lossy absolute path if it could not
    /// be made relative.
    pub path: String,
    pub kind: AccessErrorKind,
    pub message: String,
}

impl PathAccessError {
    pub fn new(path: impl Into<String>, kind: AccessErrorKind, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }
}

/// Result of one walk: live entries keyed by path plus per-path failures.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Snapshot {
    entries: BTreeMap<String, LiveEntry>,
    failures: Vec<PathAccessError>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a live entry, replacing any previous one for the same path.
    pub fn insert(&mut self, entry: LiveEntry) {
        self.entries.insert(entry.path.clone(), entry);
    }

    /// Record a per-path failure.
    pub fn record_failure(&mut self, failure: PathAccessError) {
        self.failures.push(failure);
    }

    pub fn get(&self, path: &str) -> Option<&LiveEntry> {
        self.entries.get(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Live entries sorted by path.
    pub fn entries(&self) -> impl Iterator<Item = &LiveEntry> + '_ {
        self.entries.values()
    }

    pub fn failures(&self) -> &[PathAccessError] {
        &self.failures
    }
}

/// Walk the working tree below `root`, pruning `root/<metadata_dir>`.
pub fn walk(root: &Path, metadata_dir: &str) -> Snapshot {
    let mut snapshot = Snapshot::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| !(e.depth() == 1 && e.file_type().is_dir() && e.file_name() == metadata_dir));

    for item in walker {
        let entry = match item {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().map(|p| lossy_relative_path(root, p)).unwrap_or_default();
                let kind = err
                    .io_error()
                    .map(|e| AccessErrorKind::from_io(e.kind()))
                    .unwrap_or(AccessErrorKind::Other);
                warn!(%path, error = %err, "skipping unreadable entry");
                snapshot.record_failure(PathAccessError::new(path, kind, err.to_string()));
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        let Some(rel) = relative_path(root, entry.path()) else {
            let lossy = lossy_relative_path(root, entry.path());
            warn!(path = %lossy, "skipping non UTF-8 file name");
            snapshot.record_failure(PathAccessError::new(
                lossy,
                AccessErrorKind::InvalidName,
                "file name is not valid UTF-8",
            ));
            continue;
        };

        let live = entry
            .metadata()
            .map_err(io::Error::from)
            .and_then(|meta| LiveEntry::from_metadata(rel.clone(), &meta));
        match live {
            Ok(live) => snapshot.insert(live),
            Err(err) => {
                warn!(path = %rel, error = %err, "cannot stat entry");
                snapshot.record_failure(PathAccessError::new(
                    rel,
                    AccessErrorKind::from_io(err.kind()),
                    err.to_string(),
                ));
            }
        }
    }

    debug!(
        root = %root.display(),
        entries = snapshot.len(),
        failures = snapshot.failures().len(),
        "walked working tree"
    );
    snapshot
}

/// `/`-separated path of `path` relative to `root`; `None` if it is not
/// below `root` or is not valid UTF-8.
fn relative_path(root: &Path, path: &Path) -> Option<String> {
    let rel = path.strip_prefix(root).ok()?;
    let parts = rel
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("/"))
}

/// Like [`relative_path`] but never fails: invalid UTF-8 is replaced and a
/// path outside `root` is kept whole. Used to name failures.
fn lossy_relative_path(root: &Path, path: &Path) -> String {
    match path.strip_prefix(root) {
        Ok(rel) => rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/"),
        Err(_) => path.to_string_lossy().into_owned(),
    }
}
