use alloy_primitives::Address;
use async_trait::async_trait;

use crate::{
    error::ClientResult,
    types::{Deposit, ProofResponse},
};

/// Read access to the indexer's view of deposits and claim proofs.
///
/// Implementations must tolerate being called repeatedly from polling
/// loops; a transient transport failure surfaces as an error and the caller
/// retries on its own schedule.
#[async_trait]
pub trait DepositIndex: Sync + Send + 'static {
    /// Fetches a page of deposit records whose destination is `address`.
    ///
    /// The service has no hash-based lookup, so callers scan the returned
    /// page for the record they are after. Record order carries no meaning.
    async fn deposits_for_address(
        &self,
        address: Address,
        offset: u64,
        limit: u64,
    ) -> ClientResult<Vec<Deposit>>;

    /// Fetches the Merkle proof for a deposit plus the exit roots it is
    /// valid against as of query time. Only meaningful for deposits already
    /// marked ready for claim.
    async fn merkle_proof(&self, network_id: u32, deposit_cnt: u64)
        -> ClientResult<ProofResponse>;
}
