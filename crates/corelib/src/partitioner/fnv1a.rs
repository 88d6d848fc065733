//! FNV-1a partitioner, the ring's default.

use crate::partitioner::traits::{HashError, Partitioner};
use crate::token::Token;
use fnv::FnvHasher;
use std::hash::Hasher;

/// 64-bit FNV-1a over the raw key bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct Fnv1aPartitioner;

impl Partitioner for Fnv1aPartitioner {
    fn partition(&self, key: &[u8]) -> Result<Token, HashError> {
        // Feed the bytes directly; `Hash for [u8]` would add a length prefix.
        let mut hasher = FnvHasher::default();
        hasher.write(key);
        Ok(Token(hasher.finish()))
    }

    fn name(&self) -> &'static str {
        "Fnv1aPartitioner"
    }
}
