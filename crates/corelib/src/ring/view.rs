//! Read-locked view of a ring.

use crate::error::{Error, Result};
use crate::node::RingNode;
use crate::ring::builder::RingConfig;
use crate::ring::state::RingState;
use crate::token::Token;
use crate::vnode::VirtualNode;
use parking_lot::RwLockReadGuard;
use std::sync::Arc;
use tracing::debug;

/// A consistent snapshot of a ring, held under its shared lock.
///
/// Everything read through one view comes from the same ring state, so a
/// multi-step lookup (primary, then replicas) cannot observe a half-applied
/// membership change. Writers wait until the view is dropped; keep it short.
pub struct RingView<'a, N: RingNode + ?Sized> {
    config: &'a RingConfig,
    state: RwLockReadGuard<'a, RingState<N>>,
}

impl<'a, N: RingNode + ?Sized> RingView<'a, N> {
    pub(crate) fn new(config: &'a RingConfig, state: RwLockReadGuard<'a, RingState<N>>) -> Self {
        Self { config, state }
    }

    pub fn config(&self) -> &RingConfig {
        self.config
    }

    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    pub fn member_count(&self) -> usize {
        self.state.member_count()
    }

    pub fn vnode_count(&self) -> usize {
        self.state.vnode_count()
    }

    /// Hash `key` onto the ring.
    pub fn position_of(&self, key: &str) -> Result<Token> {
        self.config
            .partitioner()
            .partition(key.as_bytes())
            .map_err(|source| Error::hashing(key, source))
    }

    /// Every virtual node exactly once, clockwise from the first position at
    /// or after `token`.
    pub fn successors(&self, token: Token) -> impl Iterator<Item = &VirtualNode> + '_ {
        self.state.successors(token)
    }

    /// The member owning `vnode`.
    pub fn resolve(&self, vnode: &VirtualNode) -> Result<&Arc<N>> {
        self.state.owner(vnode)
    }

    /// The node owning the first position clockwise from `key`.
    pub fn primary(&self, key: &str) -> Result<Arc<N>> {
        let token = self.position_of(key)?;
        let vnode = self
            .successors(token)
            .next()
            .ok_or(Error::NoConnectedNodes)?;
        let node = self.resolve(vnode)?;

        metrics::counter!("hashring_lookups_total").increment(1);
        if self.config.verbose_logs() {
            debug!(key, %token, owner = %vnode.node_id, position = %vnode.token, "key mapped to node");
        }
        Ok(Arc::clone(node))
    }
}
