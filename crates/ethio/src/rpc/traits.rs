use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;

use super::{
    error::ClientResult,
    types::{ClaimParams, TransferSpec, TxReceipt},
};

/// Read-side view of one chain.
#[async_trait]
pub trait Reader: Sync + Send + 'static {
    /// Mined receipt for `txid`, or `None` while it is not yet included.
    async fn transaction_receipt(&self, txid: B256) -> ClientResult<Option<TxReceipt>>;

    /// Native-asset balance of `address`.
    async fn balance(&self, address: Address) -> ClientResult<U256>;
}

/// Write-side access to the bridge contract on one chain.
#[async_trait]
pub trait Bridger: Sync + Send + 'static {
    /// Submits a deposit on this (origin) chain, returning the transaction
    /// hash as accepted by the node.
    async fn bridge_asset(&self, spec: &TransferSpec) -> ClientResult<B256>;

    /// Submits a manual claim on this (destination) chain, returning the
    /// transaction hash as accepted by the node.
    async fn claim_asset(&self, claim: &ClaimParams) -> ClientResult<B256>;
}
