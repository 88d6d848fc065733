//! Hash ring data structure.
//!
//! Holds the sorted virtual-node positions and the membership registry
//! behind one `parking_lot::RwLock`.

use crate::error::{Error, Result};
use crate::node::{NodeId, RingNode};
use crate::ring::builder::{clamp_vnodes, RingBuilder, RingConfig};
use crate::ring::state::RingState;
use crate::ring::view::RingView;
use crate::topology::Topology;
use crate::vnode::VirtualNode;
use parking_lot::{RwLock, RwLockUpgradableReadGuard};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Consistent hash ring.
///
/// Maps keys to members such that the mapping only changes for roughly
/// `1/N` of the keys when one of `N` members joins or leaves.
///
/// The ring is shared by reference (`&HashRing` or `Arc<HashRing>`); every
/// operation takes `&self`.
///
/// # Locking
///
/// Lookups take the shared lock. Membership changes take the upgradable lock
/// while validating and hashing, so lookups keep running, then upgrade to the
/// exclusive lock only to commit. A failed add or remove never reaches the
/// commit, so it leaves the ring exactly as it was.
///
/// # Example
///
/// ```rust
/// use corelib::{HashRing, Node};
/// use std::sync::Arc;
///
/// let ring: HashRing<Node> = HashRing::new();
/// ring.add_node(Arc::new(Node::new("server-1"))).unwrap();
/// ring.add_node(Arc::new(Node::new("server-2"))).unwrap();
///
/// let owner = ring.get_server("user:1001").unwrap();
/// assert_eq!(owner.id().as_str(), "server-1");
/// ```
pub struct HashRing<N: RingNode + ?Sized = dyn RingNode> {
    config: RingConfig,
    state: RwLock<RingState<N>>,
}

impl<N: RingNode + ?Sized> HashRing<N> {
    /// Empty ring with the default configuration.
    pub fn new() -> Self {
        Self::with_config(RingConfig::default())
    }

    pub fn with_config(config: RingConfig) -> Self {
        Self {
            config,
            state: RwLock::new(RingState::new()),
        }
    }

    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    pub fn partitioner_name(&self) -> &'static str {
        self.config.partitioner().name()
    }

    /// Add a member with the configured number of virtual nodes.
    ///
    /// # Errors
    ///
    /// - [`Error::NodeExists`] if the identifier is already a member
    /// - [`Error::Hashing`] if a virtual-node key cannot be hashed
    /// - [`Error::PositionCollision`] if a virtual node lands on a taken position
    ///
    /// The ring is unchanged whenever an error is returned.
    pub fn add_node(&self, node: Arc<N>) -> Result<()> {
        self.add_node_with_vnodes(node, self.config.vnodes())
    }

    /// Add a member with an explicit virtual-node count (its weight).
    pub fn add_node_with_vnodes(&self, node: Arc<N>, vnodes: usize) -> Result<()> {
        let vnodes = clamp_vnodes(vnodes);
        let id = NodeId::from(node.identifier());

        let state = self.state.upgradable_read();
        if state.member(id.as_str()).is_some() {
            return Err(Error::NodeExists(id));
        }

        let mut staged = VirtualNode::place_all(&id, vnodes, self.config.partitioner())?;
        staged.sort_unstable();
        state.check_placement(&staged)?;

        if self.config.verbose_logs() {
            for vnode in &staged {
                debug!(node = %id, position = %vnode.token, "placing virtual node");
            }
        }

        let mut state = RwLockUpgradableReadGuard::upgrade(state);
        state.insert(id.clone(), node, staged);
        record_membership_change("add", &state);

        if self.config.verbose_logs() {
            debug!(node = %id, vnodes, "node added");
        }
        Ok(())
    }

    /// Remove a member.
    ///
    /// # Errors
    ///
    /// - [`Error::NodeNotFound`] if the identifier is not a member, including
    ///   a second removal of the same node
    /// - [`Error::Hashing`] if a position cannot be re-derived
    ///
    /// The ring is unchanged whenever an error is returned.
    pub fn remove_node(&self, node: &N) -> Result<()> {
        self.remove_node_by_id(node.identifier())
    }

    pub fn remove_node_by_id(&self, identifier: &str) -> Result<()> {
        let id = NodeId::from(identifier);

        let state = self.state.upgradable_read();
        let vnodes = match state.member(identifier) {
            Some(member) => member.vnodes,
            None => return Err(Error::NodeNotFound(id)),
        };

        let derived = VirtualNode::place_all(&id, vnodes, self.config.partitioner())?;
        state.check_owned(&id, &derived)?;

        let mut state = RwLockUpgradableReadGuard::upgrade(state);
        state.remove(&id, &derived);
        record_membership_change("remove", &state);

        if self.config.verbose_logs() {
            for vnode in &derived {
                debug!(node = %id, position = %vnode.token, "removed virtual node");
            }
            debug!(node = %id, vnodes, "node removed");
        }
        Ok(())
    }

    /// The member responsible for `key`.
    ///
    /// # Errors
    ///
    /// - [`Error::NoConnectedNodes`] if the ring is empty
    /// - [`Error::Hashing`] if the key cannot be hashed
    pub fn get_server(&self, key: &str) -> Result<Arc<N>> {
        self.read().primary(key)
    }

    /// Lock the ring for reading and return a consistent view of it.
    pub fn read(&self) -> RingView<'_, N> {
        RingView::new(&self.config, self.state.read())
    }

    pub fn node_count(&self) -> usize {
        self.state.read().member_count()
    }

    pub fn vnode_count(&self) -> usize {
        self.state.read().vnode_count()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().is_empty()
    }

    pub fn contains(&self, identifier: &str) -> bool {
        self.state.read().member(identifier).is_some()
    }

    /// Handle of the member with this identifier.
    pub fn get_node(&self, identifier: &str) -> Option<Arc<N>> {
        self.state
            .read()
            .member(identifier)
            .map(|member| Arc::clone(&member.node))
    }

    /// Handles of all members, in no particular order.
    pub fn nodes(&self) -> Vec<Arc<N>> {
        self.state
            .read()
            .members()
            .map(|member| Arc::clone(&member.node))
            .collect()
    }

    /// Snapshot of positions and membership.
    pub fn topology(&self) -> Topology {
        self.state.read().topology()
    }
}

impl HashRing {
    /// Start configuring a ring. The node type is chosen at `build()`.
    pub fn builder() -> RingBuilder {
        RingBuilder::new()
    }
}

impl<N: RingNode + ?Sized> Default for HashRing<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: RingNode + ?Sized> fmt::Debug for HashRing<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.read();
        f.debug_struct("HashRing")
            .field("config", &self.config)
            .field("nodes", &state.member_count())
            .field("vnodes", &state.vnode_count())
            .finish()
    }
}

fn record_membership_change<N: RingNode + ?Sized>(op: &'static str, state: &RingState<N>) {
    metrics::counter!("hashring_membership_changes_total", "op" => op).increment(1);
    metrics::gauge!("hashring_members").set(state.member_count() as f64);
    metrics::gauge!("hashring_vnodes").set(state.vnode_count() as f64);
}
