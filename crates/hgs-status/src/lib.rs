//! Working-directory status for hgs.
//!
//! Ties the dirstate codec and the ignore compiler to a live walk of the
//! working tree and classifies every path into status buckets.
//!
//! # Key Types
//!
//! - [`Repository`] -- a discovered working directory and its layout
//! - [`Snapshot`] / [`LiveEntry`] -- result of the filesystem walk
//! - [`WorkdirStatus`] / [`StatusKind`] -- reconciliation result
//! - [`StatusConfig`] -- file layout, loadable from TOML

pub mod config;
pub mod error;
pub mod reconcile;
pub mod repo;
pub mod report;
pub mod snapshot;
pub mod status;

pub use config::{StatusConfig, CONFIG_FILE_NAME};
pub use error::{StatusError, StatusResult};
pub use reconcile::{reconcile, tracked_kind};
pub use repo::{find_root, Repository, DEFAULT_BRANCH};
pub use report::{dirstate_lines, status_lines, StatusFormat, StatusSelection};
pub use snapshot::{walk, AccessErrorKind, LiveEntry, PathAccessError, Snapshot};
pub use status::{StatusKind, WorkdirStatus};

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use std::time::{Duration, UNIX_EPOCH};

    use hgs_dirstate::{encode, Dirstate, FileRecord, FileState, Parents};
    use hgs_types::NodeId;

    const T: i32 = 1_600_000_000;

    fn set_mtime(path: &Path, secs: i32) {
        let file = fs::File::options().write(true).open(path).unwrap();
        file.set_modified(UNIX_EPOCH + Duration::from_secs(secs as u64)).unwrap();
    }

    fn write_dirstate(root: &Path, records: Vec<FileRecord>) {
        let mut ds = Dirstate::with_parents(Parents::new(NodeId::from_hash([1; 20]), NodeId::null()));
        for r in records {
            ds.insert(r).unwrap();
        }
        fs::write(root.join(".hg/dirstate"), encode(&ds).unwrap()).unwrap();
    }

    #[cfg(unix)]
    fn chmod(path: &Path, mode: u32) {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(mode)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn clean_file_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join(".hg")).unwrap();
        fs::write(root.join("a.txt"), b"hello").unwrap();
        chmod(&root.join("a.txt"), 0o644);
        set_mtime(&root.join("a.txt"), T);
        write_dirstate(root, vec![FileRecord::new(FileState::Normal, 0o100644, 5, T, "a.txt")]);

        let repo = Repository::open(root, None).unwrap();
        let status = repo.status().unwrap();
        assert_eq!(status.clean, vec!["a.txt"]);
        assert_eq!(status.total_entries(), 1);
        assert!(status.is_clean());
    }

    #[cfg(unix)]
    #[test]
    fn mixed_tree_end_to_end() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join(".hg")).unwrap();
        fs::create_dir_all(root.join("src")).unwrap();
        fs::write(root.join(".hgignore"), "syntax: glob\n*.o\n").unwrap();

        for (name, body) in [
            ("src/touched.rs", "same"),
            ("src/grown.rs", "longer now"),
            ("src/added.rs", "new"),
            ("copy.rs", "same"),
            ("junk.o", "obj"),
            ("notes.txt", "n"),
        ] {
            let p = root.join(name);
            fs::write(&p, body).unwrap();
            chmod(&p, 0o644);
            set_mtime(&p, T);
        }
        set_mtime(&root.join("src/touched.rs"), T + 60);

        write_dirstate(
            root,
            vec![
                FileRecord::new(FileState::Normal, 0o100644, 4, T, "src/touched.rs"),
                FileRecord::new(FileState::Normal, 0o100644, 3, T, "src/grown.rs"),
                FileRecord::new(FileState::Added, 0o100644, 3, T, "src/added.rs"),
                FileRecord::new(FileState::Added, 0o100644, 4, T, "copy.rs").with_copy_source("src/touched.rs"),
                FileRecord::new(FileState::Normal, 0o100644, 1, T, "src/missing.rs"),
                FileRecord::new(FileState::Removed, 0, 0, 0, "old.rs"),
            ],
        );

        let status = Repository::open(&root.join("src"), None).unwrap().status().unwrap();
        assert_eq!(status.modified, vec!["src/grown.rs"]);
        assert_eq!(status.added, vec!["copy.rs", "src/added.rs"]);
        assert_eq!(status.deleted, vec!["src/missing.rs"]);
        assert_eq!(status.unknown, vec![".hgignore", "notes.txt"]);
        assert_eq!(status.ignored, vec!["junk.o"]);
        assert_eq!(status.lookup, vec!["src/touched.rs"]);
        assert!(status.removed.is_empty());
        assert!(status.clean.is_empty());
        assert_eq!(status.copies.get("copy.rs").map(String::as_str), Some("src/touched.rs"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn unreadable_tracked_name_is_deleted() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir(root.join(".hg")).unwrap();
        fs::write(root.join("ok.txt"), b"ok").unwrap();
        chmod(&root.join("ok.txt"), 0o644);
        set_mtime(&root.join("ok.txt"), T);
        fs::write(root.join(OsStr::from_bytes(b"bad\xff")), b"x").unwrap();
        write_dirstate(
            root,
            vec![
                FileRecord::new(FileState::Normal, 0o100644, 2, T, "ok.txt"),
                FileRecord::new(FileState::Normal, 0o100644, 1, T, "bad\u{FFFD}"),
            ],
        );

        let status = Repository::open(root, None).unwrap().status().unwrap();
        assert_eq!(status.deleted, vec!["bad\u{FFFD}"]);
        assert_eq!(status.clean, vec!["ok.txt"]);
        assert!(status.unknown.is_empty());
        assert_eq!(status.access_errors.len(), 1);
        assert_eq!(status.access_errors[0].kind, AccessErrorKind::InvalidName);
        assert_eq!(status.access_errors[0].path, "bad\u{FFFD}");
    }

    #[test]
    fn status_serializes_to_json() {
        let mut status = WorkdirStatus::new();
        status.modified.push("a".into());
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["modified"][0], "a");
        assert!(json["access_errors"].as_array().unwrap().is_empty());
    }
}
