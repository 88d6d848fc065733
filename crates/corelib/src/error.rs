//! Error types for the core library.

use crate::node::NodeId;
use crate::partitioner::HashError;
use crate::token::Token;

/// Result type alias for the core library.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the core library.
///
/// Everything except [`Error::Inconsistent`] is an expected outcome of normal
/// operation and callers are meant to branch on it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Lookup against a ring with no members.
    #[error("no connected nodes available")]
    NoConnectedNodes,

    /// A node with this identifier is already a member.
    #[error("node already exists: {0}")]
    NodeExists(NodeId),

    /// The identifier is not a current member.
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    /// The partitioner rejected a key or virtual-node key.
    #[error("error hashing key {key:?}: {source}")]
    Hashing {
        key: String,
        #[source]
        source: HashError,
    },

    /// A virtual node would land on a position that is already taken.
    #[error("position {token} of node {incoming} is already taken by node {existing}")]
    PositionCollision {
        token: Token,
        existing: NodeId,
        incoming: NodeId,
    },

    /// Positions and membership disagree. Indicates a bug in ring maintenance.
    #[error("ring invariant violated: {0}")]
    Inconsistent(String),
}

impl Error {
    pub(crate) fn hashing(key: impl Into<String>, source: HashError) -> Self {
        Error::Hashing {
            key: key.into(),
            source,
        }
    }
}
