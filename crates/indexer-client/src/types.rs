//! Response schema of the indexer's query surface.
//!
//! The service speaks protojson: 64-bit and bigger integers arrive as
//! decimal strings, hashes and addresses as `0x` hex. Deserializers accept
//! both string and number forms for the integer fields.

use alloy_primitives::{Address, Bytes, B256, U256};
use serde::Deserialize;

/// One cross-chain transfer record as reported by the indexer.
///
/// Records are created when the service observes the origin-chain deposit
/// event and mutated in place when it observes the claim; they are never
/// deleted. The engine only reads them.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Deposit {
    /// Network the bridged token originates from.
    pub origin_network: u32,
    /// Token address on its origin network; zero means the native asset.
    pub token_address: Address,
    #[serde(with = "dec_u256")]
    pub amount: U256,
    pub dest_network: u32,
    pub dest_address: Address,
    /// Opaque metadata forwarded to the destination.
    #[serde(default)]
    pub metadata: Bytes,
    /// Hash of the origin-chain deposit transaction.
    pub tx_hash: B256,
    /// Whether on-chain state has advanced enough for a claim to be
    /// accepted. Claim fields are only meaningful once this is true.
    pub ready_for_claim: bool,
    /// Destination-chain claim transaction hash once the assistance service
    /// has submitted one; empty or zero until then.
    #[serde(default)]
    pub claim_tx_hash: String,
    /// Network the deposit was made on; scopes `deposit_cnt`.
    pub network_id: u32,
    /// Per-network monotonically increasing deposit counter.
    #[serde(with = "str_u64")]
    pub deposit_cnt: u64,
}

impl Deposit {
    /// The claim transaction hash, if one is known. Empty and all-zero
    /// values both mean no claim has been observed yet.
    pub fn claim_txid(&self) -> Option<B256> {
        let txid: B256 = self.claim_tx_hash.parse().ok()?;
        (txid != B256::ZERO).then_some(txid)
    }
}

/// Page of deposits for an address, `GET /bridges/{address}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgesResponse {
    #[serde(default)]
    pub deposits: Vec<Deposit>,
    /// Total record count for the address, as reported (wire form).
    #[serde(default)]
    pub total_cnt: Option<String>,
}

/// Proof payload, `GET /merkle-proof`. Both sibling lists are ordered from
/// the leaf up; the exit roots are the pair the proof verifies against as
/// of query time.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofResponse {
    pub main_exit_root: B256,
    pub rollup_exit_root: B256,
    pub merkle_proof: Vec<String>,
    pub rollup_merkle_proof: Vec<String>,
}

mod dec_u256 {
    use alloy_primitives::U256;
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u64),
        Str(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<U256, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Raw::deserialize(deserializer)? {
            Raw::Num(n) => Ok(U256::from(n)),
            Raw::Str(s) => {
                U256::from_str_radix(&s, 10).map_err(serde::de::Error::custom)
            }
        }
    }
}

mod str_u64 {
    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Num(u64),
        Str(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<u64, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Raw::deserialize(deserializer)? {
            Raw::Num(n) => Ok(n),
            Raw::Str(s) => s.parse().map_err(serde::de::Error::custom),
        }
    }
}
