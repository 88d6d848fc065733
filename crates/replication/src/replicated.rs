//! Hash ring with a replication factor.

use crate::strategy::{ReplicationStrategy, SimpleStrategy};
use corelib::node::RingNode;
use corelib::partitioner::{HashAlgorithm, HashError, Partitioner};
use corelib::ring::{HashRing, RingBuilder};
use corelib::Result;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Replicas per key when none is configured.
pub const DEFAULT_REPLICATION_FACTOR: usize = 2;

/// A [`HashRing`] that answers with `R` distinct members per key.
///
/// Primary and replica lookups each run under a single read view of the
/// ring, so `get_nodes_for_key(k)[0]` is always what `get_primary_node(k)`
/// returned for the same ring state.
///
/// # Example
///
/// ```rust
/// use corelib::Node;
/// use replication::ReplicatedRing;
/// use std::sync::Arc;
///
/// let ring: ReplicatedRing<Node> = ReplicatedRing::builder()
///     .with_vnodes(3)
///     .with_replication_factor(2)
///     .build();
/// for id in ["server-1", "server-2", "server-3"] {
///     ring.add_node(Arc::new(Node::new(id))).unwrap();
/// }
///
/// let replicas = ring.get_nodes_for_key("cache:session:xyz").unwrap();
/// assert_eq!(replicas.len(), 2);
/// assert_eq!(replicas[0], ring.get_primary_node("cache:session:xyz").unwrap());
/// ```
pub struct ReplicatedRing<N: RingNode + ?Sized = dyn RingNode, S = SimpleStrategy> {
    ring: HashRing<N>,
    strategy: S,
}

impl<N: RingNode + ?Sized> ReplicatedRing<N, SimpleStrategy> {
    /// Empty ring with default vnodes, hash and replication factor.
    pub fn new() -> Self {
        ReplicatedRingBuilder::new().build()
    }
}

impl ReplicatedRing {
    /// Start configuring a replicated ring. The node type is chosen at
    /// `build()`.
    pub fn builder() -> ReplicatedRingBuilder {
        ReplicatedRingBuilder::new()
    }
}

impl<N: RingNode + ?Sized> Default for ReplicatedRing<N, SimpleStrategy> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: RingNode + ?Sized, S: ReplicationStrategy> ReplicatedRing<N, S> {
    pub fn from_parts(ring: HashRing<N>, strategy: S) -> Self {
        Self { ring, strategy }
    }

    /// The underlying ring, for introspection.
    pub fn ring(&self) -> &HashRing<N> {
        &self.ring
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn replication_factor(&self) -> usize {
        self.strategy.replication_factor()
    }

    /// See [`HashRing::add_node`].
    pub fn add_node(&self, node: Arc<N>) -> Result<()> {
        self.ring.add_node(node)
    }

    pub fn add_node_with_vnodes(&self, node: Arc<N>, vnodes: usize) -> Result<()> {
        self.ring.add_node_with_vnodes(node, vnodes)
    }

    /// See [`HashRing::remove_node`].
    pub fn remove_node(&self, node: &N) -> Result<()> {
        self.ring.remove_node(node)
    }

    pub fn remove_node_by_id(&self, identifier: &str) -> Result<()> {
        self.ring.remove_node_by_id(identifier)
    }

    /// The first member clockwise from `key`.
    pub fn get_primary_node(&self, key: &str) -> Result<Arc<N>> {
        self.ring.read().primary(key)
    }

    /// Up to `R` distinct members for `key`, closest first.
    ///
    /// Returns `min(R, members)` entries; a ring with fewer members than `R`
    /// yields all of them rather than an error.
    pub fn get_nodes_for_key(&self, key: &str) -> Result<Vec<Arc<N>>> {
        let view = self.ring.read();
        let replicas = self.strategy.replicas_for_key(&view, key)?;

        metrics::counter!("hashring_replica_lookups_total").increment(1);
        if view.config().verbose_logs() {
            let owners: Vec<&str> = replicas.iter().map(|n| n.identifier()).collect();
            debug!(key, strategy = self.strategy.name(), ?owners, "key mapped to replicas");
        }
        Ok(replicas)
    }
}

impl<N: RingNode + ?Sized, S: ReplicationStrategy + fmt::Debug> fmt::Debug for ReplicatedRing<N, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReplicatedRing")
            .field("ring", &self.ring)
            .field("strategy", &self.strategy)
            .finish()
    }
}

/// Builder for [`ReplicatedRing`]; ring options plus the replication factor.
#[derive(Debug, Clone)]
pub struct ReplicatedRingBuilder {
    ring: RingBuilder,
    replication_factor: usize,
}

impl ReplicatedRingBuilder {
    pub fn new() -> Self {
        Self {
            ring: RingBuilder::new(),
            replication_factor: DEFAULT_REPLICATION_FACTOR,
        }
    }

    pub fn with_vnodes(mut self, vnodes: usize) -> Self {
        self.ring = self.ring.with_vnodes(vnodes);
        self
    }

    pub fn with_partitioner(mut self, partitioner: impl Partitioner) -> Self {
        self.ring = self.ring.with_partitioner(partitioner);
        self
    }

    pub fn with_hash_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.ring = self.ring.with_hash_algorithm(algorithm);
        self
    }

    pub fn with_hash_fn<F>(mut self, f: F) -> Self
    where
        F: Fn(&[u8]) -> std::result::Result<u64, HashError> + Send + Sync + 'static,
    {
        self.ring = self.ring.with_hash_fn(f);
        self
    }

    pub fn verbose_logs(mut self, enabled: bool) -> Self {
        self.ring = self.ring.verbose_logs(enabled);
        self
    }

    /// Replicas per key, primary included. Values below 1 are raised to 1.
    pub fn with_replication_factor(mut self, replication_factor: usize) -> Self {
        self.replication_factor = replication_factor;
        self
    }

    pub fn build<N: RingNode + ?Sized>(self) -> ReplicatedRing<N> {
        ReplicatedRing::from_parts(
            self.ring.build(),
            SimpleStrategy::new(self.replication_factor),
        )
    }
}

impl Default for ReplicatedRingBuilder {
    fn default() -> Self {
        Self::new()
    }
}
