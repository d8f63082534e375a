//! Scripted chain client for tests.

use std::sync::{
    atomic::{AtomicU64, Ordering},
    Mutex,
};

use alloy::primitives::{Address, B256, U256};
use async_trait::async_trait;

use crate::rpc::{
    error::{ClientError, ClientResult},
    traits::{Bridger, Reader},
    types::{ClaimParams, TransferSpec, TxReceipt},
};

/// A test implementation of an EVM chain client.
///
/// Receipt behavior is scripted by poll count: the first `fail_first` polls
/// error, the next `mine_after` polls report not-yet-mined, then a receipt
/// with the configured status is served for whatever hash was asked about.
/// Submissions are recorded and answer with fixed hashes.
#[derive(Debug)]
pub struct TestEvmClient {
    mine_after: u64,
    fail_first: u64,
    status: bool,
    bridge_txid: B256,
    claim_txid: B256,
    balance: U256,
    receipt_polls: AtomicU64,
    bridges: Mutex<Vec<TransferSpec>>,
    claims: Mutex<Vec<ClaimParams>>,
}

impl TestEvmClient {
    pub fn new() -> Self {
        Self {
            mine_after: 0,
            fail_first: 0,
            status: true,
            bridge_txid: B256::repeat_byte(0xB1),
            claim_txid: B256::repeat_byte(0xC1),
            balance: U256::ZERO,
            receipt_polls: AtomicU64::new(0),
            bridges: Mutex::new(Vec::new()),
            claims: Mutex::new(Vec::new()),
        }
    }

    /// Receipt polls answered not-yet-mined before a receipt appears.
    pub fn mine_after(mut self, polls: u64) -> Self {
        self.mine_after = polls;
        self
    }

    /// Receipt polls that fail with a transport error before anything else.
    pub fn fail_first(mut self, polls: u64) -> Self {
        self.fail_first = polls;
        self
    }

    /// Serve reverted receipts.
    pub fn reverting(mut self) -> Self {
        self.status = false;
        self
    }

    /// Never serve a receipt.
    pub fn never_mining(mut self) -> Self {
        self.mine_after = u64::MAX;
        self
    }

    pub fn with_bridge_txid(mut self, txid: B256) -> Self {
        self.bridge_txid = txid;
        self
    }

    pub fn with_claim_txid(mut self, txid: B256) -> Self {
        self.claim_txid = txid;
        self
    }

    pub fn with_balance(mut self, balance: U256) -> Self {
        self.balance = balance;
        self
    }

    pub fn receipt_polls(&self) -> u64 {
        self.receipt_polls.load(Ordering::SeqCst)
    }

    pub fn bridge_count(&self) -> usize {
        self.bridges.lock().unwrap().len()
    }

    pub fn claim_count(&self) -> usize {
        self.claims.lock().unwrap().len()
    }

    pub fn last_claim(&self) -> Option<ClaimParams> {
        self.claims.lock().unwrap().last().cloned()
    }
}

impl Default for TestEvmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Reader for TestEvmClient {
    async fn transaction_receipt(&self, txid: B256) -> ClientResult<Option<TxReceipt>> {
        let poll = self.receipt_polls.fetch_add(1, Ordering::SeqCst) + 1;

        if poll <= self.fail_first {
            return Err(ClientError::Transport("connection refused".to_owned()));
        }
        if poll.saturating_sub(self.fail_first) <= self.mine_after {
            return Ok(None);
        }

        Ok(Some(TxReceipt {
            txid,
            block_number: Some(100),
            success: self.status,
        }))
    }

    async fn balance(&self, _address: Address) -> ClientResult<U256> {
        Ok(self.balance)
    }
}

#[async_trait]
impl Bridger for TestEvmClient {
    async fn bridge_asset(&self, spec: &TransferSpec) -> ClientResult<B256> {
        self.bridges.lock().unwrap().push(spec.clone());
        Ok(self.bridge_txid)
    }

    async fn claim_asset(&self, claim: &ClaimParams) -> ClientResult<B256> {
        self.claims.lock().unwrap().push(claim.clone());
        Ok(self.claim_txid)
    }
}
