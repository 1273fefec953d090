//! Foundation types shared by the hgs crates.
//!
//! # Key Types
//!
//! - [`NodeId`] -- 20-byte changeset hash as stored in the dirstate parents block

pub mod node;

pub use node::{NodeId, NODE_LEN};
