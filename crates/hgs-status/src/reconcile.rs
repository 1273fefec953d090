//! Reconciliation of the dirstate against the live working tree.
//!
//! Every path present in the dirstate, the snapshot, or both lands in at most
//! one bucket:
//!
//! | dirstate            | live | result                                |
//! |---------------------|------|---------------------------------------|
//! | absent              | yes  | ignored if matched, else unknown      |
//! | `n` / `m` / `a`     | no   | deleted                               |
//! | `r`                 | no   | not reported                          |
//! | has copy source     | yes  | added                                 |
//! | `n`                 | yes  | modified / lookup / clean (see below) |
//! | `m`                 | yes  | modified                              |
//! | `a`                 | yes  | added                                 |
//! | `r`                 | yes  | removed                               |
//!
//! A normal file is modified when its size or permission bits differ, or when
//! its size is the other-parent sentinel. Otherwise a differing mtime only
//! makes it a lookup candidate: mtime alone cannot prove a content change.

use std::collections::BTreeSet;

use hgs_dirstate::{Dirstate, FileRecord, FileState};
use hgs_ignore::IgnoreMatcher;
use tracing::{debug, trace, warn};

use crate::snapshot::{LiveEntry, Snapshot};
use crate::status::{StatusKind, WorkdirStatus};

/// Classify every path of `dirstate` and `snapshot`.
pub fn reconcile(dirstate: &Dirstate, snapshot: &Snapshot, ignore: &IgnoreMatcher) -> WorkdirStatus {
    let mut status = WorkdirStatus::new();

    let failed: BTreeSet<&str> = snapshot.failures().iter().map(|f| f.path.as_str()).collect();
    let paths: BTreeSet<&str> = dirstate
        .iter()
        .map(|r| r.path.as_str())
        .chain(snapshot.entries().map(|e| e.path.as_str()))
        .collect();

    for path in paths {
        let kind = match (dirstate.get(path), snapshot.get(path)) {
            (None, Some(_)) => Some(untracked_kind(path, ignore)),
            (Some(record), None) => {
                if failed.contains(path) {
                    warn!(path, "tracked file unreadable, reporting as deleted");
                }
                missing_kind(record)
            }
            (Some(record), Some(live)) => {
                if let Some(source) = &record.copy_source {
                    status.copies.insert(path.to_string(), source.clone());
                    Some(StatusKind::Added)
                } else {
                    Some(tracked_kind(record, live))
                }
            }
            (None, None) => None,
        };

        if let Some(kind) = kind {
            trace!(path, %kind, "classified");
            status.push(kind, path);
        }
    }

    status.access_errors = snapshot.failures().to_vec();
    debug!(
        modified = status.modified.len(),
        added = status.added.len(),
        removed = status.removed.len(),
        deleted = status.deleted.len(),
        unknown = status.unknown.len(),
        ignored = status.ignored.len(),
        clean = status.clean.len(),
        lookup = status.lookup.len(),
        "reconciled working tree"
    );
    status
}

fn untracked_kind(path: &str, ignore: &IgnoreMatcher) -> StatusKind {
    if ignore.is_ignored(path) {
        StatusKind::Ignored
    } else {
        StatusKind::Unknown
    }
}

fn missing_kind(record: &FileRecord) -> Option<StatusKind> {
    match record.state {
        FileState::Normal | FileState::Merged | FileState::Added => Some(StatusKind::Deleted),
        FileState::Removed => None,
    }
}

/// Classify a tracked file that exists on disk and has no copy source.
pub fn tracked_kind(record: &FileRecord, live: &LiveEntry) -> StatusKind {
    match record.state {
        FileState::Normal => compare_normal(record, live),
        FileState::Merged => StatusKind::Modified,
        FileState::Added => StatusKind::Added,
        FileState::Removed => StatusKind::Removed,
    }
}

fn compare_normal(record: &FileRecord, live: &LiveEntry) -> StatusKind {
    // Negative sizes other than the sentinel mean "size unknown".
    let size_known = record.size >= 0;
    let stat_differs = size_known
        && (record.size != live.size as i64 || record.permission_bits() != live.permission_bits());

    if record.is_from_other_parent() || stat_differs {
        StatusKind::Modified
    } else if i64::from(record.mtime) != live.mtime {
        StatusKind::Lookup
    } else {
        StatusKind::Clean
    }
}
