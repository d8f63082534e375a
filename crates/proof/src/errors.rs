use thiserror::Error;

use crate::adapter::TREE_DEPTH;

/// Error converting an indexer proof into the fixed-depth representation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProofError {
    /// An entry was not a valid fixed-width hex hash.
    #[error("proof entry {index} is not a 32-byte hex hash: `{entry}`")]
    MalformedEntry { index: usize, entry: String },

    /// The input carries more sibling hashes than the exit trees are deep.
    /// Never silently truncated.
    #[error("proof has {0} entries, exceeds tree depth {TREE_DEPTH}")]
    TooDeep(usize),
}
