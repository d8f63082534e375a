use alloy::primitives::{Address, Bytes, B256, U256};
use traverse_proof::ClaimProof;

/// A mined transaction receipt, reduced to what callers here need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxReceipt {
    pub txid: B256,
    pub block_number: Option<u64>,
    /// Execution status: `true` for success, `false` for revert.
    pub success: bool,
}

/// Everything needed to submit a deposit on the origin chain.
#[derive(Debug, Clone)]
pub struct TransferSpec {
    /// Token to bridge; the zero address bridges the native asset.
    pub token: Address,
    pub amount: U256,
    pub dest_network: u32,
    pub dest_address: Address,
    /// Opaque metadata forwarded with the transfer.
    pub metadata: Bytes,
}

/// Arguments of the destination bridge's claim entry point.
#[derive(Debug, Clone)]
pub struct ClaimParams {
    pub proof: ClaimProof,
    pub deposit_cnt: u64,
    pub origin_network: u32,
    pub origin_token: Address,
    pub dest_network: u32,
    pub dest_address: Address,
    pub amount: U256,
    pub metadata: Bytes,
}
