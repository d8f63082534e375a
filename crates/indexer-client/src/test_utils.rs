//! Scripted index implementation for tests.

use std::sync::atomic::{AtomicU32, Ordering};

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;

use crate::{
    error::{ClientError, ClientResult},
    traits::DepositIndex,
    types::{Deposit, ProofResponse},
};

/// A test implementation of the deposit index.
///
/// Serves one deposit record whose visibility is scripted by list-call
/// count: the record appears after `appear_after` calls, flips to ready
/// after `ready_after` calls, and can be scripted to carry an auto-claim
/// transaction hash after a further call count. Proof requests are counted
/// and can be denied.
#[derive(Debug)]
pub struct TestIndexClient {
    deposit: Deposit,
    appear_after: u32,
    ready_after: u32,
    claim: Option<(u32, B256)>,
    proof: ProofResponse,
    deny_proof: bool,
    fail_lists: u32,
    list_calls: AtomicU32,
    proof_calls: AtomicU32,
}

impl TestIndexClient {
    pub fn new(deposit: Deposit) -> Self {
        Self {
            deposit,
            appear_after: 0,
            ready_after: 0,
            claim: None,
            proof: test_proof(),
            deny_proof: false,
            fail_lists: 0,
            list_calls: AtomicU32::new(0),
            proof_calls: AtomicU32::new(0),
        }
    }

    /// Number of list calls before the record shows up at all.
    pub fn appear_after(mut self, calls: u32) -> Self {
        self.appear_after = calls;
        self
    }

    /// Number of list calls before the record reports ready-for-claim.
    pub fn ready_after(mut self, calls: u32) -> Self {
        self.ready_after = calls;
        self
    }

    /// Surfaces `txid` as the auto-claim hash after `calls` list calls.
    pub fn auto_claim(mut self, calls: u32, txid: B256) -> Self {
        self.claim = Some((calls, txid));
        self
    }

    pub fn with_proof(mut self, proof: ProofResponse) -> Self {
        self.proof = proof;
        self
    }

    /// Makes every proof request fail as unavailable.
    pub fn deny_proof(mut self) -> Self {
        self.deny_proof = true;
        self
    }

    /// Fails the first `calls` list requests with a transport error. Failed
    /// requests still count towards the scripted call numbers.
    pub fn fail_lists(mut self, calls: u32) -> Self {
        self.fail_lists = calls;
        self
    }

    pub fn list_calls(&self) -> u32 {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn proof_calls(&self) -> u32 {
        self.proof_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DepositIndex for TestIndexClient {
    async fn deposits_for_address(
        &self,
        _address: Address,
        _offset: u64,
        _limit: u64,
    ) -> ClientResult<Vec<Deposit>> {
        let call = self.list_calls.fetch_add(1, Ordering::SeqCst) + 1;

        if call <= self.fail_lists {
            return Err(ClientError::Transport("connection reset".to_owned()));
        }

        // An unrelated concurrent deposit to the same address, so callers
        // must scan rather than take the first record.
        let mut page = vec![unrelated_deposit()];

        if call > self.appear_after {
            let mut deposit = self.deposit.clone();
            deposit.ready_for_claim = call > self.ready_after;
            if let Some((after, txid)) = &self.claim {
                // Claim hashes are only ever reported on ready records.
                if deposit.ready_for_claim && call > *after {
                    deposit.claim_tx_hash = txid.to_string();
                }
            }
            page.push(deposit);
        }

        Ok(page)
    }

    async fn merkle_proof(
        &self,
        network_id: u32,
        deposit_cnt: u64,
    ) -> ClientResult<ProofResponse> {
        self.proof_calls.fetch_add(1, Ordering::SeqCst);

        if self.deny_proof {
            return Err(ClientError::ProofUnavailable {
                network_id,
                deposit_cnt,
                reason: "deposit not provable".to_owned(),
            });
        }
        Ok(self.proof.clone())
    }
}

/// A deposit record with plausible defaults for tests.
pub fn test_deposit(tx_hash: B256, dest_address: Address) -> Deposit {
    Deposit {
        origin_network: 0,
        token_address: Address::ZERO,
        amount: U256::from(1000u64),
        dest_network: 1,
        dest_address,
        metadata: Bytes::new(),
        tx_hash,
        ready_for_claim: false,
        claim_tx_hash: String::new(),
        network_id: 0,
        deposit_cnt: 7,
    }
}

/// A structurally valid proof response (the adapter does not verify roots).
pub fn test_proof() -> ProofResponse {
    ProofResponse {
        main_exit_root: B256::repeat_byte(0x11),
        rollup_exit_root: B256::repeat_byte(0x22),
        merkle_proof: (0..32).map(|i| format!("0x{:064x}", i + 1)).collect(),
        rollup_merkle_proof: (0..32).map(|i| format!("0x{:064x}", i + 101)).collect(),
    }
}

fn unrelated_deposit() -> Deposit {
    Deposit {
        origin_network: 0,
        token_address: Address::repeat_byte(0xEE),
        amount: U256::from(5u64),
        dest_network: 1,
        dest_address: Address::repeat_byte(0xDD),
        metadata: Bytes::new(),
        tx_hash: B256::repeat_byte(0xAB),
        ready_for_claim: true,
        claim_tx_hash: B256::repeat_byte(0xAC).to_string(),
        network_id: 0,
        deposit_cnt: 3,
    }
}
