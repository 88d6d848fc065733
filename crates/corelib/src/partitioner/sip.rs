//! SipHash-1-3 partitioner.

use crate::partitioner::traits::{HashError, Partitioner};
use crate::token::Token;
use siphasher::sip::SipHasher13;
use std::hash::Hasher;

/// SipHash-1-3 with fixed zero keys, so positions are stable across processes.
#[derive(Clone, Copy, Debug, Default)]
pub struct SipPartitioner;

impl Partitioner for SipPartitioner {
    fn partition(&self, key: &[u8]) -> Result<Token, HashError> {
        let mut hasher = SipHasher13::new();
        hasher.write(key);
        Ok(Token(hasher.finish()))
    }

    fn name(&self) -> &'static str {
        "SipPartitioner"
    }
}
