//! Conversion of indexer-supplied Merkle proofs into the fixed-depth
//! sibling arrays the destination bridge contract verifies against.
//!
//! This is purely a format transform. Nothing here hashes or checks a proof
//! against a root; that is the destination verifier's job at claim time.

pub mod adapter;
pub mod errors;
pub mod vectors;

pub use adapter::{convert_proof, ClaimProof, MerklePath, TREE_DEPTH};
pub use errors::ProofError;
