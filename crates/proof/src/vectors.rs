//! Schema of the offline test-vector fixtures under `data/`.
//!
//! The fixture format is external and fixed; field names follow the files,
//! not our conventions. These types exist only so the adapter's unit tests
//! can consume the vectors; nothing at runtime reads them.

use serde::Deserialize;

/// One deposit leaf as it appears in the fixture files.
#[derive(Debug, Clone, Deserialize)]
pub struct DepositVector {
    #[serde(rename = "originNetwork")]
    pub origin_network: u32,
    #[serde(rename = "tokenAddress")]
    pub token_address: String,
    pub amount: String,
    #[serde(rename = "destinationNetwork")]
    pub destination_network: u32,
    #[serde(rename = "destinationAddress")]
    pub destination_address: String,
    #[serde(rename = "leafValue")]
    pub expected_hash: String,
    #[serde(rename = "currentLeafValue", default)]
    pub current_hash: String,
    pub metadata: String,
}

/// One claim-proof vector: the deposit leaves, the index being claimed, the
/// sibling path for that leaf and the root it verifies against.
#[derive(Debug, Clone, Deserialize)]
pub struct ClaimVector {
    #[serde(rename = "leafs")]
    pub leaves: Vec<DepositVector>,
    pub index: u32,
    #[serde(rename = "proof")]
    pub merkle_proof: Vec<String>,
    #[serde(rename = "root")]
    pub expected_root: String,
}

#[cfg(test)]
mod tests {
    use alloy_primitives::B256;

    use super::*;
    use crate::adapter::{convert_proof, TREE_DEPTH};

    const CLAIM_VECTORS: &str = include_str!("../data/claim_vectors.json");

    fn load() -> Vec<ClaimVector> {
        serde_json::from_str(CLAIM_VECTORS).expect("fixture should parse")
    }

    #[test]
    fn fixtures_parse() {
        let vectors = load();
        assert!(!vectors.is_empty());
        for vector in &vectors {
            assert!((vector.index as usize) < vector.leaves.len());
            assert_eq!(vector.merkle_proof.len(), TREE_DEPTH);
        }
    }

    #[test]
    fn fixture_proofs_convert() {
        for vector in load() {
            let path = convert_proof(&vector.merkle_proof).unwrap();
            for (i, entry) in vector.merkle_proof.iter().enumerate() {
                assert_eq!(path[i], entry.parse::<B256>().unwrap());
            }
        }
    }

    #[test]
    fn fixture_roots_and_leaves_are_hashes() {
        for vector in load() {
            vector
                .expected_root
                .parse::<B256>()
                .expect("root should be a 32-byte hash");
            for leaf in &vector.leaves {
                leaf.expected_hash
                    .parse::<B256>()
                    .expect("leaf value should be a 32-byte hash");
            }
        }
    }
}
