use alloy_primitives::B256;

use crate::errors::ProofError;

/// Depth of both exit trees. The destination verifier expects sibling
/// arrays of exactly this length, with unused trailing slots zeroed.
pub const TREE_DEPTH: usize = 32;

/// Fixed-depth sibling-hash path, index 0 closest to the leaf.
pub type MerklePath = [B256; TREE_DEPTH];

/// Evidence required by the destination chain's verifier to accept a manual
/// claim: sibling paths for the local exit tree and the rollup exit tree,
/// plus the global exit root pair they must verify against.
///
/// Exit roots advance as the bridge processes transfers, so a proof is only
/// valid against the roots fetched alongside it. Fetch fresh per claim
/// attempt; never reuse across attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimProof {
    pub local_path: MerklePath,
    pub rollup_path: MerklePath,
    pub main_exit_root: B256,
    pub rollup_exit_root: B256,
}

impl ClaimProof {
    /// Builds a proof from the indexer's hex-string representation of both
    /// paths and the exit root pair reported with them.
    pub fn from_parts(
        local: &[String],
        rollup: &[String],
        main_exit_root: B256,
        rollup_exit_root: B256,
    ) -> Result<Self, ProofError> {
        Ok(Self {
            local_path: convert_proof(local)?,
            rollup_path: convert_proof(rollup)?,
            main_exit_root,
            rollup_exit_root,
        })
    }
}

/// Converts an ordered list of hex hash strings into the fixed-depth
/// sibling array. Entries are placed in input order starting at index 0;
/// trailing slots stay the zero hash. Inputs longer than [`TREE_DEPTH`] are
/// rejected rather than truncated.
pub fn convert_proof(entries: &[String]) -> Result<MerklePath, ProofError> {
    if entries.len() > TREE_DEPTH {
        return Err(ProofError::TooDeep(entries.len()));
    }

    let mut path = [B256::ZERO; TREE_DEPTH];
    for (i, entry) in entries.iter().enumerate() {
        path[i] = parse_hash(entry).ok_or_else(|| ProofError::MalformedEntry {
            index: i,
            entry: entry.clone(),
        })?;
    }
    Ok(path)
}

/// Strict 32-byte hex parse, `0x` prefix optional.
fn parse_hash(s: &str) -> Option<B256> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    let mut buf = [0u8; 32];
    hex::decode_to_slice(digits, &mut buf).ok()?;
    Some(B256::from(buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash_strings(n: usize) -> Vec<String> {
        (0..n)
            .map(|i| format!("0x{:064x}", i as u128 + 0xa1))
            .collect()
    }

    #[test]
    fn converts_in_order_and_zero_fills() {
        let input = hash_strings(5);
        let path = convert_proof(&input).unwrap();

        assert_eq!(path.len(), TREE_DEPTH);
        for (i, entry) in input.iter().enumerate() {
            assert_eq!(path[i], entry.parse::<B256>().unwrap());
        }
        for slot in &path[input.len()..] {
            assert_eq!(*slot, B256::ZERO, "trailing slots must stay zeroed");
        }
    }

    #[test]
    fn empty_input_is_all_zero() {
        let path = convert_proof(&[]).unwrap();
        assert!(path.iter().all(|h| *h == B256::ZERO));
    }

    #[test]
    fn full_depth_input_fills_every_slot() {
        let input = hash_strings(TREE_DEPTH);
        let path = convert_proof(&input).unwrap();
        assert_eq!(
            path[TREE_DEPTH - 1],
            input[TREE_DEPTH - 1].parse::<B256>().unwrap()
        );
    }

    #[test]
    fn rejects_deeper_than_tree() {
        let input = hash_strings(TREE_DEPTH + 1);
        assert_eq!(
            convert_proof(&input),
            Err(ProofError::TooDeep(TREE_DEPTH + 1))
        );
    }

    #[test]
    fn rejects_malformed_entry() {
        let mut input = hash_strings(3);
        input[1] = "0xnot-hex".to_owned();
        match convert_proof(&input) {
            Err(ProofError::MalformedEntry { index: 1, .. }) => {}
            other => panic!("expected malformed entry at index 1, got {other:?}"),
        }
    }

    #[test]
    fn rejects_short_hash() {
        // 31 bytes of hex is not a hash, even though it decodes.
        let input = vec![format!("0x{}", "ab".repeat(31))];
        assert!(matches!(
            convert_proof(&input),
            Err(ProofError::MalformedEntry { index: 0, .. })
        ));
    }

    #[test]
    fn prefix_is_optional() {
        let bare = vec!["cd".repeat(32)];
        let prefixed = vec![format!("0x{}", "cd".repeat(32))];
        assert_eq!(convert_proof(&bare), convert_proof(&prefixed));
    }
}
