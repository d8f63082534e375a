use std::sync::Arc;

use alloy_primitives::B256;
use tokio::time::{interval, Instant};
use tracing::*;
use traverse_common::shutdown::Shutdown;
use traverse_ethio::{
    confirm::{wait_mined, ConfirmError},
    rpc::{
        traits::{Bridger, Reader},
        types::{ClaimParams, TransferSpec},
    },
};
use traverse_indexer_client::DepositIndex;
use traverse_proof::ClaimProof;

use crate::{
    config::ReconcileConfig,
    errors::{ReconcileError, ReconcileErrorKind},
    state::{Attempt, ReconcilePhase},
};

/// Drives deposits end to end: submit on the origin chain, wait for the
/// indexer, prefer the assistance service's auto-claim, fall back to a
/// manual claim, and confirm the final transaction on the destination
/// chain.
///
/// One instance may serve many concurrent attempts: it holds only
/// read-shared connection handles and immutable configuration, and each
/// call to [`Reconciler::submit_and_reconcile`] owns its attempt state.
#[derive(Debug)]
pub struct Reconciler<O, D, I> {
    origin: Arc<O>,
    dest: Arc<D>,
    index: Arc<I>,
    config: ReconcileConfig,
}

impl<O, D, I> Reconciler<O, D, I>
where
    O: Reader + Bridger,
    D: Reader + Bridger,
    I: DepositIndex,
{
    pub fn new(origin: Arc<O>, dest: Arc<D>, index: Arc<I>, config: ReconcileConfig) -> Self {
        Self {
            origin,
            dest,
            index,
            config,
        }
    }

    /// Submits the deposit described by `spec` on the origin chain and
    /// reconciles it to a confirmed claim on the destination chain,
    /// returning the claim transaction hash.
    ///
    /// Fails with a [`ReconcileError`] carrying the phase the attempt was
    /// in, the elapsed time and the last observed deposit record. The
    /// engine never retries a finished attempt on its own.
    pub async fn submit_and_reconcile(
        &self,
        spec: &TransferSpec,
        shutdown: &Shutdown,
    ) -> Result<B256, ReconcileError> {
        let mut attempt = Attempt::new();

        info!(token = %spec.token, amount = %spec.amount, dest = %spec.dest_address,
            "submitting bridge deposit");
        let origin_txid = self
            .origin
            .bridge_asset(spec)
            .await
            .map_err(|e| attempt.fail(ReconcileErrorKind::OriginTxFailed(e.to_string())))?;
        debug!(%origin_txid, "bridge deposit accepted");

        match wait_mined(
            self.origin.as_ref(),
            origin_txid,
            self.config.mining_timeout(),
            shutdown,
        )
        .await
        {
            Ok(_) => {
                info!(%origin_txid, "origin deposit mined");
                attempt.phase = ReconcilePhase::AwaitingIndex;
            }
            Err(ConfirmError::Cancelled { .. }) => {
                return Err(attempt.fail(ReconcileErrorKind::Cancelled));
            }
            Err(err) => {
                return Err(attempt.fail(ReconcileErrorKind::OriginTxFailed(err.to_string())));
            }
        }

        self.wait_for_ready(&mut attempt, origin_txid, spec, shutdown)
            .await?;

        let claim_txid = match self
            .wait_for_auto_claim(&mut attempt, origin_txid, spec, shutdown)
            .await?
        {
            Some(txid) => txid,
            None => self.submit_manual_claim(&mut attempt).await?,
        };
        attempt.claim_txid = Some(claim_txid);
        attempt.phase = ReconcilePhase::Confirming;

        match wait_mined(
            self.dest.as_ref(),
            claim_txid,
            self.config.mining_timeout(),
            shutdown,
        )
        .await
        {
            Ok(receipt) => {
                attempt.phase = ReconcilePhase::Claimed;
                info!(%claim_txid, block = ?receipt.block_number, elapsed = ?attempt.elapsed(),
                    "claim confirmed");
                Ok(claim_txid)
            }
            Err(ConfirmError::Reverted { .. }) => {
                Err(attempt.fail(ReconcileErrorKind::ClaimTxReverted(claim_txid)))
            }
            Err(ConfirmError::Timeout { .. }) => {
                Err(attempt.fail(ReconcileErrorKind::ConfirmationTimeout(claim_txid)))
            }
            Err(ConfirmError::Cancelled { .. }) => {
                Err(attempt.fail(ReconcileErrorKind::Cancelled))
            }
        }
    }

    /// Polls the index until the deposit record for `origin_txid` exists
    /// and reports ready-for-claim, within the readiness budget.
    async fn wait_for_ready(
        &self,
        attempt: &mut Attempt,
        origin_txid: B256,
        spec: &TransferSpec,
        shutdown: &Shutdown,
    ) -> Result<(), ReconcileError> {
        let budget = self.config.readiness_timeout();
        let deadline = Instant::now() + budget;
        let mut shutdown = shutdown.clone();
        let mut ticker = interval(self.config.poll_interval());

        loop {
            if shutdown.should_shutdown() {
                return Err(attempt.fail(ReconcileErrorKind::Cancelled));
            }
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown.wait_for_shutdown() => {
                    return Err(attempt.fail(ReconcileErrorKind::Cancelled));
                }
            }

            match self
                .index
                .deposits_for_address(spec.dest_address, 0, self.config.deposit_page_limit)
                .await
            {
                Ok(deposits) => {
                    // Several deposits may target the same address; match by
                    // exact origin hash, never by position in the page.
                    if let Some(deposit) =
                        deposits.into_iter().find(|d| d.tx_hash == origin_txid)
                    {
                        if attempt.phase == ReconcilePhase::AwaitingIndex {
                            debug!(deposit_cnt = %deposit.deposit_cnt, "deposit indexed");
                            attempt.phase = ReconcilePhase::AwaitingReady;
                        }
                        let ready = deposit.ready_for_claim;
                        attempt.last_seen = Some(deposit);
                        if ready {
                            info!(%origin_txid, elapsed = ?attempt.elapsed(),
                                "deposit ready for claim");
                            attempt.phase = ReconcilePhase::AwaitingAutoClaim;
                            return Ok(());
                        }
                    }
                }
                Err(err) => {
                    // Transient; the budget, not the error, ends this loop.
                    warn!(%err, "deposit query failed, retrying");
                }
            }

            if Instant::now() >= deadline {
                return Err(attempt.fail(ReconcileErrorKind::ReadinessTimeout(budget)));
            }
        }
    }

    /// Watches the deposit record for an assistance-service claim hash
    /// within the auto-claim budget. Returns `None` once the budget is
    /// spent, which sends the attempt down the manual path.
    async fn wait_for_auto_claim(
        &self,
        attempt: &mut Attempt,
        origin_txid: B256,
        spec: &TransferSpec,
        shutdown: &Shutdown,
    ) -> Result<Option<B256>, ReconcileError> {
        let budget = self.config.auto_claim_timeout();
        let deadline = Instant::now() + budget;
        let mut shutdown = shutdown.clone();
        let mut ticker = interval(self.config.poll_interval());

        loop {
            // The hash may already be on the record we hold from the
            // readiness poll.
            if let Some(txid) = attempt.last_seen.as_ref().and_then(|d| d.claim_txid()) {
                info!(%txid, "auto-claim detected");
                return Ok(Some(txid));
            }

            if Instant::now() >= deadline {
                info!(%origin_txid, budget = ?budget,
                    "no auto-claim within budget, falling back to manual claim");
                attempt.phase = ReconcilePhase::ManualClaim;
                return Ok(None);
            }

            if shutdown.should_shutdown() {
                return Err(attempt.fail(ReconcileErrorKind::Cancelled));
            }
            tokio::select! {
                _ = ticker.tick() => {}
                _ = shutdown.wait_for_shutdown() => {
                    return Err(attempt.fail(ReconcileErrorKind::Cancelled));
                }
            }

            match self
                .index
                .deposits_for_address(spec.dest_address, 0, self.config.deposit_page_limit)
                .await
            {
                Ok(deposits) => {
                    if let Some(deposit) =
                        deposits.into_iter().find(|d| d.tx_hash == origin_txid)
                    {
                        attempt.last_seen = Some(deposit);
                    }
                }
                Err(err) => {
                    warn!(%err, "deposit query failed, retrying");
                }
            }
        }
    }

    /// Fetches a fresh proof and submits the claim ourselves. Submits at
    /// most one manual claim per attempt: re-entry after the first
    /// submission returns the known hash instead of resubmitting.
    async fn submit_manual_claim(&self, attempt: &mut Attempt) -> Result<B256, ReconcileError> {
        if attempt.manual_submitted {
            if let Some(txid) = attempt.claim_txid {
                debug!(%txid, "manual claim already submitted, not resubmitting");
                return Ok(txid);
            }
        }

        // Claiming an unready deposit would only waste a transaction the
        // contract rejects; refuse locally. Unreachable through the normal
        // phase order.
        let deposit = match attempt.last_seen.as_ref() {
            Some(d) if d.ready_for_claim => d.clone(),
            _ => {
                return Err(
                    attempt.fail(ReconcileErrorKind::ReadinessTimeout(
                        self.config.readiness_timeout(),
                    )),
                )
            }
        };

        info!(network_id = %deposit.network_id, deposit_cnt = %deposit.deposit_cnt,
            "fetching claim proof");
        // Always fetched fresh: exit roots advance between calls and a
        // stale proof no longer verifies.
        let response = self
            .index
            .merkle_proof(deposit.network_id, deposit.deposit_cnt)
            .await
            .map_err(|e| attempt.fail(ReconcileErrorKind::ProofUnavailable(e)))?;

        let proof = ClaimProof::from_parts(
            &response.merkle_proof,
            &response.rollup_merkle_proof,
            response.main_exit_root,
            response.rollup_exit_root,
        )
        .map_err(|e| attempt.fail(ReconcileErrorKind::MalformedProof(e)))?;

        let params = ClaimParams {
            proof,
            deposit_cnt: deposit.deposit_cnt,
            origin_network: deposit.origin_network,
            origin_token: deposit.token_address,
            dest_network: deposit.dest_network,
            dest_address: deposit.dest_address,
            amount: deposit.amount,
            metadata: deposit.metadata.clone(),
        };

        let txid = self
            .dest
            .claim_asset(&params)
            .await
            .map_err(|e| attempt.fail(ReconcileErrorKind::Transport(e.to_string())))?;
        attempt.manual_submitted = true;
        attempt.claim_txid = Some(txid);
        info!(%txid, deposit_cnt = %deposit.deposit_cnt, "manual claim submitted");
        Ok(txid)
    }
}
