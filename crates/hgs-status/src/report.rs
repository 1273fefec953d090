//! Text rendering of status results and dirstate dumps.

use chrono::{Local, TimeZone};
use hgs_dirstate::{Dirstate, FileRecord, MODE_MASK};

use crate::status::{StatusKind, WorkdirStatus};

/// Which buckets a status report shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusSelection {
    pub modified: bool,
    pub added: bool,
    pub removed: bool,
    pub deleted: bool,
    pub unknown: bool,
    pub ignored: bool,
    pub clean: bool,
}

impl StatusSelection {
    /// Shown when no bucket is requested explicitly.
    pub fn default_set() -> Self {
        Self {
            modified: true,
            added: true,
            removed: true,
            deleted: true,
            unknown: true,
            ignored: false,
            clean: false,
        }
    }

    pub fn all() -> Self {
        Self {
            ignored: true,
            clean: true,
            ..Self::default_set()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Lookup files ride along with modified ones: they may be modified.
    pub fn includes(&self, kind: StatusKind) -> bool {
        match kind {
            StatusKind::Modified | StatusKind::Lookup => self.modified,
            StatusKind::Added => self.added,
            StatusKind::Removed => self.removed,
            StatusKind::Deleted => self.deleted,
            StatusKind::Unknown => self.unknown,
            StatusKind::Ignored => self.ignored,
            StatusKind::Clean => self.clean,
        }
    }
}

/// Options for [`status_lines`].
#[derive(Clone, Copy, Debug, Default)]
pub struct StatusFormat {
    /// Print bare paths without the status character.
    pub no_status: bool,
    /// Print the copy source under each added copy target.
    pub copies: bool,
}

/// Render a status as `<char> <path>` lines in fixed bucket order.
pub fn status_lines(status: &WorkdirStatus, selection: &StatusSelection, format: StatusFormat) -> Vec<String> {
    let mut lines = Vec::new();
    for kind in StatusKind::ALL {
        if !selection.includes(kind) {
            continue;
        }
        for path in status.paths(kind) {
            if format.no_status {
                lines.push(path.clone());
            } else {
                lines.push(format!("{} {}", kind.prefix(), path));
            }
            if format.copies && kind == StatusKind::Added {
                if let Some(source) = status.copies.get(path) {
                    lines.push(format!("  {source}"));
                }
            }
        }
    }
    lines
}

/// Render a dirstate as `debugdirstate` lines, sorted by path, followed by
/// one `copy:` line per copy.
///
/// With `dates` false the mtime column shows `set` instead of a timestamp,
/// which keeps the output stable across time zones.
pub fn dirstate_lines(dirstate: &Dirstate, dates: bool) -> Vec<String> {
    let mut lines: Vec<String> = dirstate.iter().map(|r| record_line(r, dates)).collect();
    lines.extend(
        dirstate
            .copies()
            .map(|(dst, src)| format!("copy: {src} -> {dst}")),
    );
    lines
}

fn record_line(record: &FileRecord, dates: bool) -> String {
    format!(
        "{} {:3o} {:10} {:<19} {}",
        record.state,
        record.mode & MODE_MASK,
        record.size,
        mtime_column(record.mtime, dates),
        record.path
    )
}

fn mtime_column(mtime: i32, dates: bool) -> String {
    if mtime < 0 {
        return "unset".into();
    }
    if !dates {
        return "set".into();
    }
    match Local.timestamp_opt(i64::from(mtime), 0).single() {
        Some(t) => t.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => mtime.to_string(),
    }
}
