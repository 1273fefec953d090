//! Binary dirstate codec.
//!
//! On-disk format:
//! ```text
//! [20 bytes: parent 1 node]
//! [20 bytes: parent 2 node]
//! repeated until end of input:
//!   [1 byte: state tag]
//!   [4 bytes: mode (big-endian u32)]
//!   [4 bytes: size (big-endian i32)]
//!   [4 bytes: mtime (big-endian i32)]
//!   [4 bytes: name length (big-endian u32)]
//!   [N bytes: name, optionally "path\0copy-source"]
//! ```
//!
//! There is no framing beyond the declared lengths, so the decoder stops at
//! the first inconsistency instead of trying to resynchronize.

use std::io::ErrorKind;
use std::path::Path;

use hgs_types::{NodeId, NODE_LEN};
use tracing::debug;

use crate::dirstate::{Dirstate, Parents};
use crate::entry::{FileRecord, FileState};
use crate::error::{DirstateError, DirstateResult};

/// Size of the parents block.
pub const PARENTS_LEN: usize = 2 * NODE_LEN;

/// Size of a record header: state, mode, size, mtime, name length.
pub const RECORD_HEADER_LEN: usize = 17;

/// Decode a dirstate from raw bytes. Empty input is an empty dirstate.
pub fn decode(data: &[u8]) -> DirstateResult<Dirstate> {
    if data.is_empty() {
        return Ok(Dirstate::new());
    }
    if data.len() < PARENTS_LEN {
        return Err(DirstateError::TruncatedRecord {
            offset: 0,
            needed: PARENTS_LEN,
            remaining: data.len(),
        });
    }

    let p1 = NodeId::from_hash(node_at(data, 0));
    let p2 = NodeId::from_hash(node_at(data, NODE_LEN));
    let mut dirstate = Dirstate::with_parents(Parents::new(p1, p2));

    let mut pos = PARENTS_LEN;
    while pos < data.len() {
        let offset = pos as u64;
        let remaining = data.len() - pos;
        if remaining < RECORD_HEADER_LEN {
            return Err(DirstateError::TruncatedRecord {
                offset,
                needed: RECORD_HEADER_LEN,
                remaining,
            });
        }

        let header = &data[pos..pos + RECORD_HEADER_LEN];
        let state = FileState::from_tag(header[0])
            .ok_or(DirstateError::InvalidState { offset, byte: header[0] })?;
        let mode = be_u32(&header[1..5]);
        let size = be_u32(&header[5..9]) as i32;
        let mtime = be_u32(&header[9..13]) as i32;
        let name_len = be_u32(&header[13..17]);
        pos += RECORD_HEADER_LEN;

        let remaining = data.len() - pos;
        if name_len as usize > remaining {
            return Err(DirstateError::CorruptHeader {
                offset,
                name_len,
                remaining,
            });
        }
        let name = &data[pos..pos + name_len as usize];
        pos += name_len as usize;

        let (path, copy_source) = split_name(name, offset)?;
        let mut record = FileRecord::new(state, mode, i64::from(size), mtime, path);
        record.copy_source = copy_source;

        if let Err(dup) = dirstate.insert(record) {
            return Err(DirstateError::DuplicateEntry {
                offset,
                path: dup.path,
            });
        }
    }

    debug!(
        entries = dirstate.len(),
        merge = dirstate.parents().is_merge(),
        "decoded dirstate"
    );
    Ok(dirstate)
}

/// Encode a dirstate back to its on-disk byte form.
///
/// Records are written in their original order, so `encode(&decode(b)?)`
/// reproduces `b` for any stream that decodes successfully. A dirstate with
/// null parents and no records encodes to the 40-byte parents block.
///
/// Records built by hand may hold a size outside `i32` or a name longer than
/// `u32::MAX`; those fail with [`DirstateError::Unencodable`].
pub fn encode(dirstate: &Dirstate) -> DirstateResult<Vec<u8>> {
    let mut out = Vec::with_capacity(PARENTS_LEN + dirstate.len() * (RECORD_HEADER_LEN + 16));
    out.extend_from_slice(dirstate.parents().p1.as_bytes());
    out.extend_from_slice(dirstate.parents().p2.as_bytes());

    for record in dirstate.records() {
        let mut name = record.path.as_bytes().to_vec();
        if let Some(source) = &record.copy_source {
            name.push(0);
            name.extend_from_slice(source.as_bytes());
        }
        let size = i32::try_from(record.size).map_err(|_| unencodable(record, "size", record.size))?;
        let name_len = u32::try_from(name.len())
            .map_err(|_| unencodable(record, "name length", i64::try_from(name.len()).unwrap_or(i64::MAX)))?;

        out.push(record.state.tag());
        out.extend_from_slice(&record.mode.to_be_bytes());
        out.extend_from_slice(&size.to_be_bytes());
        out.extend_from_slice(&record.mtime.to_be_bytes());
        out.extend_from_slice(&name_len.to_be_bytes());
        out.extend_from_slice(&name);
    }
    Ok(out)
}

fn unencodable(record: &FileRecord, field: &'static str, value: i64) -> DirstateError {
    DirstateError::Unencodable {
        path: record.path.clone(),
        field,
        value,
    }
}

/// Read and decode the dirstate file at `path`.
///
/// A missing file is a valid empty dirstate with null parents.
pub fn load(path: &Path) -> DirstateResult<Dirstate> {
    let data = match std::fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "no dirstate file, assuming empty");
            return Ok(Dirstate::new());
        }
        Err(source) => {
            return Err(DirstateError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    decode(&data)
}

fn split_name(name: &[u8], offset: u64) -> DirstateResult<(String, Option<String>)> {
    let to_string = |bytes: &[u8]| {
        String::from_utf8(bytes.to_vec()).map_err(|_| DirstateError::InvalidPathEncoding { offset })
    };
    match name.iter().position(|&b| b == 0) {
        Some(nul) => Ok((to_string(&name[..nul])?, Some(to_string(&name[nul + 1..])?))),
        None => Ok((to_string(name)?, None)),
    }
}

fn node_at(data: &[u8], start: usize) -> [u8; NODE_LEN] {
    let mut node = [0u8; NODE_LEN];
    node.copy_from_slice(&data[start..start + NODE_LEN]);
    node
}

fn be_u32(bytes: &[u8]) -> u32 {
    u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}
