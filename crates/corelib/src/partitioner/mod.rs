//! Partitioner abstraction for consistent hashing.
//!
//! Partitioners are responsible for converting keys into tokens that can be
//! placed on the hash ring. The ring takes one at construction time and uses
//! it for both virtual-node placement and key lookup.

pub mod blake;
pub mod fnv1a;
pub mod func;
pub mod sip;
pub mod traits;
pub mod xxh3;

pub use blake::Blake3Partitioner;
pub use fnv1a::Fnv1aPartitioner;
pub use func::FnPartitioner;
pub use sip::SipPartitioner;
pub use traits::{HashError, Partitioner};
pub use xxh3::Xxh3Partitioner;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// The bundled hash algorithms, by name.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HashAlgorithm {
    #[default]
    Fnv1a,
    Sip13,
    Xxh3,
    Blake3,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 4] = [
        HashAlgorithm::Fnv1a,
        HashAlgorithm::Sip13,
        HashAlgorithm::Xxh3,
        HashAlgorithm::Blake3,
    ];

    /// Instantiate the partitioner for this algorithm.
    pub fn partitioner(self) -> Arc<dyn Partitioner> {
        match self {
            HashAlgorithm::Fnv1a => Arc::new(Fnv1aPartitioner),
            HashAlgorithm::Sip13 => Arc::new(SipPartitioner),
            HashAlgorithm::Xxh3 => Arc::new(Xxh3Partitioner),
            HashAlgorithm::Blake3 => Arc::new(Blake3Partitioner),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HashAlgorithm::Fnv1a => "fnv1a",
            HashAlgorithm::Sip13 => "sip13",
            HashAlgorithm::Xxh3 => "xxh3",
            HashAlgorithm::Blake3 => "blake3",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
