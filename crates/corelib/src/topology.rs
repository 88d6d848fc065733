//! Ring topology snapshots.
//!
//! A [`Topology`] is a detached copy of the ring's positions and membership.
//! It is cheap to compare, so it doubles as the way to check that a sequence
//! of operations left the ring exactly as it found it.

use crate::node::NodeId;
use crate::token::Token;
use crate::vnode::VirtualNode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Size of the ring's key space, 2^64.
const RING_SIZE: f64 = 18_446_744_073_709_551_616.0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberSummary {
    pub id: NodeId,
    pub vnodes: usize,
}

/// Point-in-time view of the ring.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topology {
    /// Sorted by token.
    vnodes: Vec<VirtualNode>,
    /// Sorted by id.
    members: Vec<MemberSummary>,
}

impl Topology {
    pub(crate) fn new(vnodes: Vec<VirtualNode>, mut members: Vec<MemberSummary>) -> Self {
        debug_assert!(vnodes.windows(2).all(|w| w[0].token < w[1].token));
        members.sort_by(|a, b| a.id.cmp(&b.id));
        Self { vnodes, members }
    }

    pub fn vnodes(&self) -> &[VirtualNode] {
        &self.vnodes
    }

    pub fn members(&self) -> &[MemberSummary] {
        &self.members
    }

    pub fn is_empty(&self) -> bool {
        self.vnodes.is_empty()
    }

    /// Owner of the first position at or after `token`, wrapping.
    pub fn owner_of(&self, token: Token) -> Option<&NodeId> {
        let idx = self.vnodes.partition_point(|v| v.token < token);
        self.vnodes
            .get(idx)
            .or_else(|| self.vnodes.first())
            .map(|v| &v.node_id)
    }

    /// Fraction of the key space each member owns, in member order.
    ///
    /// A vnode owns the arc from its predecessor (exclusive) to itself
    /// (inclusive). Fractions sum to 1.0 for a non-empty ring.
    pub fn ownership(&self) -> Vec<(NodeId, f64)> {
        let mut arcs: BTreeMap<&NodeId, u128> = BTreeMap::new();
        if let [only] = self.vnodes.as_slice() {
            arcs.insert(&only.node_id, 1u128 << 64);
        } else {
            for (i, vnode) in self.vnodes.iter().enumerate() {
                let prev = if i == 0 {
                    &self.vnodes[self.vnodes.len() - 1]
                } else {
                    &self.vnodes[i - 1]
                };
                *arcs.entry(&vnode.node_id).or_default() += u128::from(prev.distance_to(vnode));
            }
        }

        self.members
            .iter()
            .map(|m| {
                let arc = arcs.get(&m.id).copied().unwrap_or(0);
                (m.id.clone(), arc as f64 / RING_SIZE)
            })
            .collect()
    }
}
