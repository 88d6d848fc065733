//! Ring configuration and its builder.

use crate::node::RingNode;
use crate::partitioner::{FnPartitioner, Fnv1aPartitioner, HashAlgorithm, HashError, Partitioner};
use crate::ring::HashRing;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Virtual nodes per member when none is configured.
pub const DEFAULT_VNODES: usize = 3;

/// Immutable ring configuration.
///
/// Fixed once the ring is built. Members keep the vnode count they were added
/// with, so there is no way for a later setting to re-place them.
#[derive(Clone)]
pub struct RingConfig {
    vnodes: usize,
    partitioner: Arc<dyn Partitioner>,
    verbose_logs: bool,
}

impl RingConfig {
    /// Virtual nodes given to each member added without an explicit count.
    pub fn vnodes(&self) -> usize {
        self.vnodes
    }

    pub fn partitioner(&self) -> &dyn Partitioner {
        self.partitioner.as_ref()
    }

    /// Whether the ring emits per-operation debug events.
    pub fn verbose_logs(&self) -> bool {
        self.verbose_logs
    }
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            vnodes: DEFAULT_VNODES,
            partitioner: Arc::new(Fnv1aPartitioner),
            verbose_logs: false,
        }
    }
}

impl fmt::Debug for RingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingConfig")
            .field("vnodes", &self.vnodes)
            .field("partitioner", &self.partitioner.name())
            .field("verbose_logs", &self.verbose_logs)
            .finish()
    }
}

/// Builder for [`HashRing`].
///
/// Options apply in call order; setting the same option twice keeps the last
/// value.
///
/// ```rust
/// use corelib::{HashRing, Node, RingBuilder};
/// use corelib::partitioner::HashAlgorithm;
///
/// let ring: HashRing<Node> = RingBuilder::new()
///     .with_vnodes(64)
///     .with_hash_algorithm(HashAlgorithm::Xxh3)
///     .build();
/// assert!(ring.is_empty());
/// assert_eq!(ring.config().vnodes(), 64);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RingBuilder {
    config: RingConfig,
}

impl RingBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Virtual nodes per member. Values below 1 are raised to 1.
    pub fn with_vnodes(mut self, vnodes: usize) -> Self {
        self.config.vnodes = clamp_vnodes(vnodes);
        self
    }

    pub fn with_partitioner(mut self, partitioner: impl Partitioner) -> Self {
        self.config.partitioner = Arc::new(partitioner);
        self
    }

    pub fn with_shared_partitioner(mut self, partitioner: Arc<dyn Partitioner>) -> Self {
        self.config.partitioner = partitioner;
        self
    }

    pub fn with_hash_algorithm(self, algorithm: HashAlgorithm) -> Self {
        self.with_shared_partitioner(algorithm.partitioner())
    }

    /// Use a plain function as the hash.
    pub fn with_hash_fn<F>(self, f: F) -> Self
    where
        F: Fn(&[u8]) -> Result<u64, HashError> + Send + Sync + 'static,
    {
        self.with_partitioner(FnPartitioner::new(f))
    }

    pub fn verbose_logs(mut self, enabled: bool) -> Self {
        self.config.verbose_logs = enabled;
        self
    }

    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    pub fn into_config(self) -> RingConfig {
        self.config
    }

    /// Build an empty ring.
    pub fn build<N: RingNode + ?Sized>(self) -> HashRing<N> {
        HashRing::with_config(self.config)
    }
}

pub(crate) fn clamp_vnodes(vnodes: usize) -> usize {
    if vnodes == 0 {
        warn!("virtual node count must be at least 1, using 1");
        1
    } else {
        vnodes
    }
}
