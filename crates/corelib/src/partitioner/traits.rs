//! Core partitioner trait definitions.

use crate::token::Token;
use std::fmt;

/// Failure reported by a partitioner for a particular key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct HashError {
    message: String,
}

impl HashError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A partitioner converts keys into tokens for placement on the hash ring.
///
/// The same partitioner places virtual nodes and looks up keys, so it must be
/// deterministic: equal input bytes always give the same token.
pub trait Partitioner: Send + Sync + fmt::Debug + 'static {
    /// Converts a key into a token.
    ///
    /// # Arguments
    ///
    /// * `key` - The key to partition
    ///
    /// # Returns
    ///
    /// A token representing the position on the ring, or the reason the key
    /// could not be hashed.
    fn partition(&self, key: &[u8]) -> Result<Token, HashError>;

    /// Returns the name of this partitioner.
    fn name(&self) -> &'static str;
}
