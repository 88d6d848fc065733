//! BLAKE3 partitioner.

use crate::partitioner::traits::{HashError, Partitioner};
use crate::token::Token;

/// First 8 bytes of the BLAKE3 digest, little-endian.
#[derive(Clone, Copy, Debug, Default)]
pub struct Blake3Partitioner;

impl Partitioner for Blake3Partitioner {
    fn partition(&self, key: &[u8]) -> Result<Token, HashError> {
        let hash = blake3::hash(key);
        let mut prefix = [0u8; 8];
        prefix.copy_from_slice(&hash.as_bytes()[..8]);
        Ok(Token(u64::from_le_bytes(prefix)))
    }

    fn name(&self) -> &'static str {
        "Blake3Partitioner"
    }
}
