//! Node abstractions for the consistent hash ring.
//!
//! The ring never looks inside a node. All it needs is a stable string
//! identifier, exposed through [`RingNode`]. Concrete node types belong to the
//! caller; [`Node`] is a small ready-made one.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

/// Capability every ring member must provide.
///
/// The identifier must stay the same for as long as the node is a member of
/// a ring: removal re-derives the node's positions from it.
pub trait RingNode: Send + Sync {
    /// Stable, unique identifier of this node.
    fn identifier(&self) -> &str;
}

impl RingNode for str {
    fn identifier(&self) -> &str {
        self
    }
}

impl RingNode for String {
    fn identifier(&self) -> &str {
        self.as_str()
    }
}

impl RingNode for &'static str {
    fn identifier(&self) -> &str {
        self
    }
}

/// Owned node identifier.
///
/// Newtype over `Arc<str>` so the many virtual nodes of one member share a
/// single allocation and clones stay cheap.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(Arc<str>);

impl NodeId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl RingNode for NodeId {
    fn identifier(&self) -> &str {
        self.as_str()
    }
}

/// Logical node participating in the ring.
///
/// Keep this struct small and cheap to clone; connections and other heavy
/// state should live elsewhere.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    id: NodeId,
    /// Optional network address, carried for the caller's convenience.
    address: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            address: None,
        }
    }

    pub fn with_address(id: impl Into<NodeId>, address: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            address: Some(address.into()),
        }
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }
}

impl RingNode for Node {
    fn identifier(&self) -> &str {
        self.id.as_str()
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.address {
            Some(address) => write!(f, "{}@{}", self.id, address),
            None => write!(f, "{}", self.id),
        }
    }
}
