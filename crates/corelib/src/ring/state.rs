//! Ring state guarded by the ring's lock.
//!
//! Positions and the membership registry live in one struct so a single lock
//! covers both. Mutations here never fail: callers validate first, then commit.

use crate::error::{Error, Result};
use crate::node::{NodeId, RingNode};
use crate::token::Token;
use crate::topology::{MemberSummary, Topology};
use crate::vnode::VirtualNode;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::error;

/// Membership record.
pub(crate) struct Member<N: ?Sized> {
    pub(crate) node: Arc<N>,
    /// Vnode count the member was added with.
    pub(crate) vnodes: usize,
}

pub(crate) struct RingState<N: ?Sized> {
    /// Every active virtual node, sorted by token.
    vnodes: Vec<VirtualNode>,
    members: HashMap<NodeId, Member<N>>,
}

impl<N: RingNode + ?Sized> RingState<N> {
    pub(crate) fn new() -> Self {
        Self {
            vnodes: Vec::new(),
            members: HashMap::new(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.vnodes.is_empty()
    }

    pub(crate) fn member_count(&self) -> usize {
        self.members.len()
    }

    pub(crate) fn vnode_count(&self) -> usize {
        self.vnodes.len()
    }

    pub(crate) fn member(&self, id: &str) -> Option<&Member<N>> {
        self.members.get(id)
    }

    pub(crate) fn members(&self) -> impl Iterator<Item = &Member<N>> + '_ {
        self.members.values()
    }

    /// Virtual nodes clockwise from the first position `>= token`, wrapping
    /// past the highest position to the lowest. Each vnode is yielded once.
    pub(crate) fn successors(&self, token: Token) -> impl Iterator<Item = &VirtualNode> + '_ {
        // partition_point == len means "past every position": the split puts
        // everything in `before` and the walk starts at index 0.
        let start = self.vnodes.partition_point(|v| v.token < token);
        let (before, after) = self.vnodes.split_at(start);
        after.iter().chain(before.iter())
    }

    pub(crate) fn owner(&self, vnode: &VirtualNode) -> Result<&Arc<N>> {
        match self.members.get(&vnode.node_id) {
            Some(member) => Ok(&member.node),
            None => {
                error!(token = %vnode.token, node = %vnode.node_id, "position owned by unregistered node");
                Err(Error::Inconsistent(format!(
                    "position {} owned by unregistered node {}",
                    vnode.token, vnode.node_id
                )))
            }
        }
    }

    /// Reject `staged` (sorted) if any of its tokens is taken, either by an
    /// existing vnode or by another staged vnode.
    pub(crate) fn check_placement(&self, staged: &[VirtualNode]) -> Result<()> {
        for pair in staged.windows(2) {
            if pair[0].token == pair[1].token {
                return Err(Error::PositionCollision {
                    token: pair[1].token,
                    existing: pair[0].node_id.clone(),
                    incoming: pair[1].node_id.clone(),
                });
            }
        }
        for vnode in staged {
            if let Ok(i) = self.vnodes.binary_search_by_key(&vnode.token, |v| v.token) {
                return Err(Error::PositionCollision {
                    token: vnode.token,
                    existing: self.vnodes[i].node_id.clone(),
                    incoming: vnode.node_id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Confirm every re-derived vnode of `id` is present and owned by `id`.
    pub(crate) fn check_owned(&self, id: &NodeId, derived: &[VirtualNode]) -> Result<()> {
        for vnode in derived {
            match self.vnodes.binary_search_by_key(&vnode.token, |v| v.token) {
                Ok(i) if self.vnodes[i].node_id == *id => {}
                _ => {
                    error!(node = %id, token = %vnode.token, "member is missing a derived position");
                    return Err(Error::Inconsistent(format!(
                        "node {id} does not own position {}",
                        vnode.token
                    )));
                }
            }
        }
        Ok(())
    }

    pub(crate) fn insert(&mut self, id: NodeId, node: Arc<N>, staged: Vec<VirtualNode>) {
        let vnodes = staged.len();
        self.vnodes.extend(staged);
        self.vnodes.sort_unstable();
        self.members.insert(id, Member { node, vnodes });
    }

    pub(crate) fn remove(&mut self, id: &NodeId, derived: &[VirtualNode]) -> Option<Member<N>> {
        let mut tokens: Vec<Token> = derived.iter().map(|v| v.token).collect();
        tokens.sort_unstable();
        self.vnodes.retain(|v| tokens.binary_search(&v.token).is_err());
        self.members.remove(id)
    }

    pub(crate) fn topology(&self) -> Topology {
        let members = self
            .members
            .iter()
            .map(|(id, member)| MemberSummary {
                id: id.clone(),
                vnodes: member.vnodes,
            })
            .collect();
        Topology::new(self.vnodes.clone(), members)
    }
}
