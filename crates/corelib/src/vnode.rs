//! Virtual node abstractions.
//!
//! # Virtual Nodes (VNodes) Concept
//!
//! Instead of each physical node owning a single token on the ring, each node
//! owns `V` tokens. This provides:
//!
//! 1. **Better Load Distribution**: More tokens = smoother distribution of keys
//! 2. **Gradual Rebalancing**: When nodes join/leave, only a fraction of keys move
//! 3. **Fault Tolerance**: Failure of one node affects fewer keys (spread across vnodes)
//!
//! # Placement
//!
//! Virtual node `i` of node `id` sits at `partition("<id>_<i>")`. Nothing about
//! a placement is stored beyond the resulting token; removal derives the same
//! keys again from the identifier and the member's vnode count.
//!
//! # Performance Characteristics
//!
//! - **Memory**: O(v) where v = number of vnodes per node
//! - **Lookup**: O(log n) where n = total vnodes
//! - **Rebalancing**: roughly k/N keys move when one of N nodes joins or leaves

use crate::error::{Error, Result};
use crate::node::NodeId;
use crate::partitioner::Partitioner;
use crate::token::Token;
use serde::{Deserialize, Serialize};

/// Key hashed to place virtual node `index` of the node named `identifier`.
///
/// ```rust
/// assert_eq!(corelib::vnode::vnode_key("server-1", 2), "server-1_2");
/// ```
pub fn vnode_key(identifier: &str, index: usize) -> String {
    format!("{identifier}_{index}")
}

/// A virtual node on the hash ring.
///
/// Represents a single token position owned by a physical node.
///
/// # Invariants
///
/// - Within one ring, no two `VirtualNode`s share a token
/// - Every `VirtualNode` belongs to exactly one current member
/// - Ordering is by token first, so a sorted `Vec<VirtualNode>` is the ring
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VirtualNode {
    /// Token position on the ring.
    pub token: Token,

    /// The physical node that owns this virtual node.
    ///
    /// Multiple virtual nodes share the same `node_id`. A lookup lands on a
    /// vnode's token, then routes to the member named here.
    pub node_id: NodeId,
}

impl VirtualNode {
    #[inline]
    pub fn new(token: Token, node_id: NodeId) -> Self {
        Self { token, node_id }
    }

    /// Place virtual node `index` of `node_id` with the given partitioner.
    ///
    /// # Errors
    ///
    /// [`Error::Hashing`] carrying the virtual-node key if the partitioner
    /// rejects it.
    ///
    /// # Example
    /// ```rust
    /// use corelib::partitioner::Fnv1aPartitioner;
    /// use corelib::{NodeId, VirtualNode};
    ///
    /// let vnode0 = VirtualNode::from_index(&NodeId::from("server-1"), 0, &Fnv1aPartitioner).unwrap();
    /// let vnode1 = VirtualNode::from_index(&NodeId::from("server-1"), 1, &Fnv1aPartitioner).unwrap();
    /// assert_ne!(vnode0.token(), vnode1.token());
    /// ```
    pub fn from_index(
        node_id: &NodeId,
        index: usize,
        partitioner: &dyn Partitioner,
    ) -> Result<Self> {
        let key = vnode_key(node_id.as_str(), index);
        let token = partitioner
            .partition(key.as_bytes())
            .map_err(|source| Error::hashing(key, source))?;
        Ok(Self::new(token, node_id.clone()))
    }

    /// Place all `count` virtual nodes of `node_id`, in index order.
    ///
    /// Stops at the first index the partitioner rejects; nothing is returned
    /// for the indices placed before it.
    pub fn place_all(
        node_id: &NodeId,
        count: usize,
        partitioner: &dyn Partitioner,
    ) -> Result<Vec<Self>> {
        (0..count)
            .map(|index| Self::from_index(node_id, index, partitioner))
            .collect()
    }

    #[inline]
    pub fn token(&self) -> Token {
        self.token
    }

    #[inline]
    pub fn node_id(&self) -> &NodeId {
        &self.node_id
    }

    /// Clockwise distance to another virtual node.
    #[inline]
    pub fn distance_to(&self, other: &Self) -> u64 {
        self.token.distance_to(other.token)
    }
}

impl std::fmt::Display for VirtualNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VNode(token={}, node={})", self.token, self.node_id)
    }
}
