//! Simple replication strategy.
//!
//! Places R replicas on distinct members, clockwise from the key.
//!
//! # Algorithm
//!
//! 1. Hash the key and find the first virtual node at or after it (wrapping)
//! 2. Walk clockwise over virtual nodes, keeping each member the first time
//!    it shows up and skipping it afterwards
//! 3. Stop after `min(R, members)` members, or after one full turn
//!
//! Taking the next R *virtual* nodes instead would often name the same
//! member several times once V is large, which is no redundancy at all.
//!
//! # Performance
//!
//! - **Time**: O(log n + w) where n = vnodes and w = vnodes walked, usually
//!   a small multiple of R
//! - **Space**: O(R)
//!
//! # Limitations
//!
//! - Doesn't consider data center/rack placement

use crate::strategy::ReplicationStrategy;
use corelib::node::{NodeId, RingNode};
use corelib::ring::RingView;
use corelib::{Error, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{error, warn};

/// Simple replication strategy: R distinct members clockwise from the key.
///
/// # Example
///
/// ```rust
/// use corelib::{HashRing, Node};
/// use replication::{ReplicationStrategy, SimpleStrategy};
/// use std::sync::Arc;
///
/// let ring: HashRing<Node> = HashRing::new();
/// for id in ["server-1", "server-2", "server-3"] {
///     ring.add_node(Arc::new(Node::new(id))).unwrap();
/// }
///
/// let strategy = SimpleStrategy::new(2);
/// let replicas = strategy.replicas_for_key(&ring.read(), "user:1001").unwrap();
/// let ids: Vec<_> = replicas.iter().map(|n| n.id().as_str()).collect();
/// assert_eq!(ids, ["server-1", "server-3"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimpleStrategy {
    /// Number of replicas to create (including primary).
    replication_factor: usize,
}

impl SimpleStrategy {
    /// Create a strategy with the given replication factor.
    ///
    /// A factor of 0 is raised to 1: every key has at least its primary.
    pub fn new(replication_factor: usize) -> Self {
        let replication_factor = if replication_factor == 0 {
            warn!("replication factor must be at least 1, using 1");
            1
        } else {
            replication_factor
        };
        Self { replication_factor }
    }
}

impl Default for SimpleStrategy {
    fn default() -> Self {
        Self::new(crate::replicated::DEFAULT_REPLICATION_FACTOR)
    }
}

impl ReplicationStrategy for SimpleStrategy {
    fn replication_factor(&self) -> usize {
        self.replication_factor
    }

    fn replicas_for_key<N: RingNode + ?Sized>(
        &self,
        view: &RingView<'_, N>,
        key: &str,
    ) -> Result<Vec<Arc<N>>> {
        let token = view.position_of(key)?;
        if view.is_empty() {
            return Err(Error::NoConnectedNodes);
        }

        let wanted = self.replication_factor.min(view.member_count());
        let mut replicas: Vec<Arc<N>> = Vec::with_capacity(wanted);
        let mut seen: HashSet<&NodeId> = HashSet::with_capacity(wanted);

        for vnode in view.successors(token) {
            if seen.insert(&vnode.node_id) {
                replicas.push(Arc::clone(view.resolve(vnode)?));
                if replicas.len() == wanted {
                    return Ok(replicas);
                }
            }
        }

        // A full turn visits every member at least once.
        error!(key, wanted, found = replicas.len(), "replica walk came up short");
        Err(Error::Inconsistent(format!(
            "found {} of {wanted} distinct members for key {key:?}",
            replicas.len()
        )))
    }

    fn name(&self) -> &'static str {
        "SimpleStrategy"
    }
}
