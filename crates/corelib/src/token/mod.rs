//! Token abstraction for the hash ring.
//!
//! A token is a position on the circular `u64` space. Both virtual nodes and
//! lookup keys are mapped to tokens by a [`Partitioner`](crate::Partitioner).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position on the ring.
#[derive(
    Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Token(pub u64);

impl Token {
    /// Start of the ring.
    pub const MIN: Token = Token(0);
    /// End of the ring; the next position clockwise is [`Token::MIN`].
    pub const MAX: Token = Token(u64::MAX);

    /// Raw ring value.
    #[inline]
    pub fn value(self) -> u64 {
        self.0
    }

    /// Clockwise distance from `self` to `other` on the ring.
    #[inline]
    pub fn distance_to(self, other: Token) -> u64 {
        other.0.wrapping_sub(self.0)
    }
}

impl From<u64> for Token {
    fn from(value: u64) -> Self {
        Token(value)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}
