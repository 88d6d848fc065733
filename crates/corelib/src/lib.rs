//! Core library for consistent hashing.
//!
//! This crate provides the fundamental pieces of a consistent hash ring:
//! - Tokens (positions on the `u64` ring)
//! - Partitioners (pluggable hash functions, FNV-1a by default)
//! - Node identity and virtual nodes
//! - The ring itself, its builder and read views
//! - Topology snapshots
//!
//! Replica selection across distinct members lives in the `replication` crate.

pub mod error;
pub mod node;
pub mod partitioner;
pub mod ring;
pub mod token;
pub mod topology;
pub mod vnode;

pub use error::{Error, Result};
pub use node::{Node, NodeId, RingNode};
pub use partitioner::{HashAlgorithm, HashError, Partitioner};
pub use ring::{HashRing, Ring, RingBuilder, RingConfig, RingView};
pub use token::Token;
pub use topology::Topology;
pub use vnode::VirtualNode;
