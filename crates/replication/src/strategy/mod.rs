//! Replication strategy abstractions.
//!
//! Replication strategies determine how many replicas to create and where
//! to place them on the ring.
//!
//! - **SimpleStrategy**: N distinct members, in clockwise order from the key

pub mod simple;

pub use simple::SimpleStrategy;

use corelib::node::RingNode;
use corelib::ring::RingView;
use corelib::Result;
use std::sync::Arc;

/// Trait for replication strategies.
///
/// A replication strategy determines:
/// 1. How many replicas to create for a key
/// 2. Which members should hold those replicas
///
/// # Thread Safety
///
/// Implementations must be thread-safe (Send + Sync) as they are shared by
/// every caller of the ring.
pub trait ReplicationStrategy: Send + Sync + 'static {
    /// Number of replicas this strategy aims for, primary included.
    fn replication_factor(&self) -> usize;

    /// Members that should hold `key`, primary first.
    ///
    /// Works entirely off `view`, so the answer reflects one ring state.
    ///
    /// # Errors
    ///
    /// - [`corelib::Error::NoConnectedNodes`] if the ring is empty
    /// - [`corelib::Error::Hashing`] if the key cannot be hashed
    fn replicas_for_key<N: RingNode + ?Sized>(
        &self,
        view: &RingView<'_, N>,
        key: &str,
    ) -> Result<Vec<Arc<N>>>;

    /// Strategy name (for logging/debugging).
    fn name(&self) -> &'static str;
}
