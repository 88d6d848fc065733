//! XXH3 partitioner.

use crate::partitioner::traits::{HashError, Partitioner};
use crate::token::Token;
use xxhash_rust::xxh3::xxh3_64;

/// 64-bit XXH3, seed 0.
#[derive(Clone, Copy, Debug, Default)]
pub struct Xxh3Partitioner;

impl Partitioner for Xxh3Partitioner {
    fn partition(&self, key: &[u8]) -> Result<Token, HashError> {
        Ok(Token(xxh3_64(key)))
    }

    fn name(&self) -> &'static str {
        "Xxh3Partitioner"
    }
}
