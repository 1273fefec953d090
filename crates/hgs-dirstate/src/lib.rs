//! Dirstate codec for hgs.
//!
//! Decodes the binary `.hg/dirstate` index: the two working-directory parents
//! followed by one record per tracked file. Names may embed a copy source after
//! a NUL byte, which is surfaced as [`FileRecord::copy_source`].
//!
//! # Key Types
//!
//! - [`Dirstate`] -- parents plus records, ordered by path
//! - [`FileRecord`] / [`FileState`] -- one tracked entry and its state tag
//! - [`decode`] / [`encode`] / [`load`] -- the codec entry points

pub mod codec;
pub mod dirstate;
pub mod entry;
pub mod error;

pub use codec::{decode, encode, load, PARENTS_LEN, RECORD_HEADER_LEN};
pub use dirstate::{Dirstate, Parents};
pub use entry::{FileRecord, FileState, MODE_MASK, SIZE_FROM_OTHER_PARENT};
pub use error::{DirstateError, DirstateResult};
