//! Closure-backed partitioner.

use crate::partitioner::traits::{HashError, Partitioner};
use crate::token::Token;
use std::fmt;

/// Adapts a plain function into a [`Partitioner`].
///
/// ```rust
/// use corelib::partitioner::{FnPartitioner, Partitioner};
///
/// let p = FnPartitioner::new(|key: &[u8]| Ok(key.len() as u64));
/// assert_eq!(p.partition(b"abc").unwrap().value(), 3);
/// ```
pub struct FnPartitioner<F> {
    name: &'static str,
    f: F,
}

impl<F> FnPartitioner<F>
where
    F: Fn(&[u8]) -> Result<u64, HashError> + Send + Sync + 'static,
{
    pub fn new(f: F) -> Self {
        Self::named("FnPartitioner", f)
    }

    pub fn named(name: &'static str, f: F) -> Self {
        Self { name, f }
    }
}

impl<F> fmt::Debug for FnPartitioner<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnPartitioner").field("name", &self.name).finish()
    }
}

impl<F> Partitioner for FnPartitioner<F>
where
    F: Fn(&[u8]) -> Result<u64, HashError> + Send + Sync + 'static,
{
    fn partition(&self, key: &[u8]) -> Result<Token, HashError> {
        (self.f)(key).map(Token)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
