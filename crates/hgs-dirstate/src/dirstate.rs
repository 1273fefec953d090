//! The in-memory dirstate.
//!
//! Records are kept in the order they were decoded so the on-disk stream can
//! be reproduced exactly, and indexed by path in a `BTreeMap` so callers get
//! deterministic, lexicographically ordered traversal.

use std::collections::BTreeMap;

use hgs_types::NodeId;
use serde::{Deserialize, Serialize};

use crate::entry::FileRecord;

/// The two working-directory parents stored at the head of the dirstate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parents {
    pub p1: NodeId,
    pub p2: NodeId,
}

impl Parents {
    pub fn new(p1: NodeId, p2: NodeId) -> Self {
        Self { p1, p2 }
    }

    /// A working directory with a second parent is mid-merge.
    pub fn is_merge(&self) -> bool {
        !self.p2.is_null()
    }
}

/// Decoded dirstate: parents plus one [`FileRecord`] per tracked path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Dirstate {
    parents: Parents,
    records: Vec<FileRecord>,
    by_path: BTreeMap<String, usize>,
}

impl Dirstate {
    /// An empty dirstate with null parents.
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty dirstate with the given parents.
    pub fn with_parents(parents: Parents) -> Self {
        Self {
            parents,
            ..Self::default()
        }
    }

    pub fn parents(&self) -> &Parents {
        &self.parents
    }

    /// Number of tracked entries.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Add a record. A record whose path is already present is handed back
    /// unchanged and the dirstate is left as it was.
    pub fn insert(&mut self, record: FileRecord) -> Result<(), FileRecord> {
        if self.by_path.contains_key(&record.path) {
            return Err(record);
        }
        self.by_path.insert(record.path.clone(), self.records.len());
        self.records.push(record);
        Ok(())
    }

    pub fn get(&self, path: &str) -> Option<&FileRecord> {
        self.by_path.get(path).map(|&i| &self.records[i])
    }

    pub fn contains(&self, path: &str) -> bool {
        self.by_path.contains_key(path)
    }

    /// Records sorted by path.
    pub fn iter(&self) -> impl Iterator<Item = &FileRecord> + '_ {
        self.by_path.values().map(move |&i| &self.records[i])
    }

    /// Records in on-disk order.
    pub fn records(&self) -> &[FileRecord] {
        &self.records
    }

    /// Copy source of `path`, if it was recorded as a copy target.
    pub fn copy_source(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|r| r.copy_source.as_deref())
    }

    /// `(destination, source)` pairs sorted by destination.
    pub fn copies(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.iter()
            .filter_map(|r| r.copy_source.as_deref().map(|src| (r.path.as_str(), src)))
    }

    /// Copy side map, destination to source.
    pub fn copy_map(&self) -> BTreeMap<String, String> {
        self.copies()
            .map(|(dst, src)| (dst.to_string(), src.to_string()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::FileState;

    fn rec(path: &str) -> FileRecord {
        FileRecord::new(FileState::Normal, 0o644, 1, 0, path)
    }

    #[test]
    fn new_dirstate_is_empty() {
        let ds = Dirstate::new();
        assert!(ds.is_empty());
        assert!(ds.parents().p1.is_null());
        assert!(!ds.parents().is_merge());
    }

    #[test]
    fn iter_is_sorted_records_keep_file_order() {
        let mut ds = Dirstate::new();
        ds.insert(rec("b")).unwrap();
        ds.insert(rec("a/z")).unwrap();
        ds.insert(rec("a")).unwrap();

        let sorted: Vec<&str> = ds.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(sorted, vec!["a", "a/z", "b"]);

        let on_disk: Vec<&str> = ds.records().iter().map(|r| r.path.as_str()).collect();
        assert_eq!(on_disk, vec!["b", "a/z", "a"]);
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let mut ds = Dirstate::new();
        ds.insert(rec("same")).unwrap();
        let rejected = ds.insert(FileRecord::new(FileState::Added, 0, 0, 0, "same")).unwrap_err();
        assert_eq!(rejected.state, FileState::Added);
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.get("same").unwrap().state, FileState::Normal);
    }

    #[test]
    fn copies_sorted_by_destination() {
        let mut ds = Dirstate::new();
        ds.insert(rec("z").with_copy_source("a")).unwrap();
        ds.insert(rec("m")).unwrap();
        ds.insert(rec("c").with_copy_source("y")).unwrap();

        let copies: Vec<_> = ds.copies().collect();
        assert_eq!(copies, vec![("c", "y"), ("z", "a")]);
        assert_eq!(ds.copy_source("z"), Some("a"));
        assert_eq!(ds.copy_source("m"), None);
        assert_eq!(ds.copy_map().len(), 2);
    }
}
