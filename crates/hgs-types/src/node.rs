use std::fmt;

use serde::{Deserialize, Serialize};

/// Length in bytes of a changeset node hash.
pub const NODE_LEN: usize = 20;

/// Identifier of a changeset, as recorded in the dirstate parents block.
///
/// The all-zero node is the null revision: a working directory with no
/// checked-out parent, or the absent second parent outside of a merge.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId([u8; NODE_LEN]);

impl NodeId {
    /// Wrap raw hash bytes.
    pub const fn from_hash(hash: [u8; NODE_LEN]) -> Self {
        Self(hash)
    }

    /// The null node (all zeros).
    pub const fn null() -> Self {
        Self([0u8; NODE_LEN])
    }

    /// Returns `true` if this is the null node.
    pub fn is_null(&self) -> bool {
        self.0 == [0u8; NODE_LEN]
    }

    /// The raw hash bytes.
    pub fn as_bytes(&self) -> &[u8; NODE_LEN] {
        &self.0
    }

    /// Full 40-character hex form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short 12-character hex form, as Mercurial prints changeset ids.
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..6])
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::null()
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.short_hex())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl From<[u8; NODE_LEN]> for NodeId {
    fn from(bytes: [u8; NODE_LEN]) -> Self {
        Self(bytes)
    }
}
