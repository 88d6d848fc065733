//! Replication strategies for consistent hashing.
//!
//! This crate answers "which `R` distinct members should hold this key":
//! - [`ReplicationStrategy`] decides how replicas are picked from a ring
//! - [`SimpleStrategy`] walks clockwise, skipping members already chosen
//! - [`ReplicatedRing`] pairs a ring with a strategy and exposes primary and
//!   replica-set lookups
//!
//! It names owners only; moving data between them is the caller's business.

pub mod replicated;
pub mod strategy;

pub use replicated::{ReplicatedRing, ReplicatedRingBuilder, DEFAULT_REPLICATION_FACTOR};
pub use strategy::{ReplicationStrategy, SimpleStrategy};
