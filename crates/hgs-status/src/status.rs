//! Working directory status types.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::snapshot::PathAccessError;

/// Classification bucket of a path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatusKind {
    Modified,
    Added,
    Removed,
    /// Tracked but missing from the working tree.
    Deleted,
    Unknown,
    Ignored,
    Clean,
    /// Size and mode match but mtime differs: content unverified.
    Lookup,
}

impl StatusKind {
    /// Report order: the seven definitive buckets, then lookup.
    pub const ALL: [StatusKind; 8] = [
        Self::Modified,
        Self::Added,
        Self::Removed,
        Self::Deleted,
        Self::Unknown,
        Self::Ignored,
        Self::Clean,
        Self::Lookup,
    ];

    /// Single-character prefix used in status output.
    pub fn prefix(self) -> char {
        match self {
            Self::Modified => 'M',
            Self::Added => 'A',
            Self::Removed => 'R',
            Self::Deleted => '!',
            Self::Unknown => '?',
            Self::Ignored => 'I',
            Self::Clean => 'C',
            Self::Lookup => 'L',
        }
    }

    /// Lowercase bucket name, matching the [`WorkdirStatus`] field.
    pub fn name(self) -> &'static str {
        match self {
            Self::Modified => "modified",
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Deleted => "deleted",
            Self::Unknown => "unknown",
            Self::Ignored => "ignored",
            Self::Clean => "clean",
            Self::Lookup => "lookup",
        }
    }
}

impl fmt::Display for StatusKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.prefix())
    }
}

/// Complete status of the working directory relative to the dirstate.
///
/// Every bucket is sorted by path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkdirStatus {
    pub modified: Vec<String>,
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub deleted: Vec<String>,
    pub unknown: Vec<String>,
    pub ignored: Vec<String>,
    pub clean: Vec<String>,
    /// Files whose content needs comparing before they can be called clean
    /// or modified.
    pub lookup: Vec<String>,
    /// Copy sources of added copy targets, keyed by destination.
    pub copies: BTreeMap<String, String>,
    /// Paths that could not be read during the walk.
    pub access_errors: Vec<PathAccessError>,
}

impl WorkdirStatus {
    /// Create an empty status.
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths in one bucket.
    pub fn paths(&self, kind: StatusKind) -> &[String] {
        match kind {
            StatusKind::Modified => &self.modified,
            StatusKind::Added => &self.added,
            StatusKind::Removed => &self.removed,
            StatusKind::Deleted => &self.deleted,
            StatusKind::Unknown => &self.unknown,
            StatusKind::Ignored => &self.ignored,
            StatusKind::Clean => &self.clean,
            StatusKind::Lookup => &self.lookup,
        }
    }

    pub(crate) fn push(&mut self, kind: StatusKind, path: &str) {
        let bucket = match kind {
            StatusKind::Modified => &mut self.modified,
            StatusKind::Added => &mut self.added,
            StatusKind::Removed => &mut self.removed,
            StatusKind::Deleted => &mut self.deleted,
            StatusKind::Unknown => &mut self.unknown,
            StatusKind::Ignored => &mut self.ignored,
            StatusKind::Clean => &mut self.clean,
            StatusKind::Lookup => &mut self.lookup,
        };
        bucket.push(path.to_string());
    }

    /// The bucket `path` landed in, if any.
    pub fn kind_of(&self, path: &str) -> Option<StatusKind> {
        StatusKind::ALL
            .into_iter()
            .find(|&k| self.paths(k).binary_search_by(|p| p.as_str().cmp(path)).is_ok())
    }

    /// Returns `true` if nothing differs from the dirstate: no modified,
    /// added, removed, deleted, unknown or unverified files.
    pub fn is_clean(&self) -> bool {
        self.modified.is_empty()
            && self.added.is_empty()
            && self.removed.is_empty()
            && self.deleted.is_empty()
            && self.unknown.is_empty()
            && self.lookup.is_empty()
    }

    /// Total number of classified paths across all buckets.
    pub fn total_entries(&self) -> usize {
        StatusKind::ALL.iter().map(|&k| self.paths(k).len()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_status_is_clean() {
        let status = WorkdirStatus::new();
        assert!(status.is_clean());
        assert_eq!(status.total_entries(), 0);
    }

    #[test]
    fn clean_and_ignored_do_not_dirty_the_tree() {
        let mut status = WorkdirStatus::new();
        status.push(StatusKind::Clean, "a");
        status.push(StatusKind::Ignored, "b.o");
        assert!(status.is_clean());
        assert_eq!(status.total_entries(), 2);
    }

    #[test]
    fn lookup_is_not_clean() {
        let mut status = WorkdirStatus::new();
        status.push(StatusKind::Lookup, "maybe");
        assert!(!status.is_clean());
        assert_eq!(status.kind_of("maybe"), Some(StatusKind::Lookup));
        assert_eq!(status.kind_of("other"), None);
    }

    #[test]
    fn prefixes() {
        let chars: String = StatusKind::ALL.iter().map(|k| k.prefix()).collect();
        assert_eq!(chars, "MAR!?ICL");
    }

    #[test]
    fn names_match_serialized_fields() {
        let json = serde_json::to_value(WorkdirStatus::new()).unwrap();
        for kind in StatusKind::ALL {
            assert!(json.get(kind.name()).is_some(), "{}", kind.name());
        }
    }
}
