//! Consistent hash ring implementation.
//!
//! The ring manages virtual-node positions and provides lookup operations
//! for finding the node responsible for a key.

pub mod builder;
#[allow(clippy::module_inception)]
pub mod ring;
mod state;
pub mod view;

pub use builder::{RingBuilder, RingConfig, DEFAULT_VNODES};
pub use ring::HashRing;
pub use view::RingView;

/// A hash ring over any mix of node types unless a concrete `N` is given.
pub type Ring<N = dyn crate::node::RingNode> = HashRing<N>;
