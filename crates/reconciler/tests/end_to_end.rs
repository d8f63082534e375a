//! End-to-end reconciliation scenarios against scripted chain and index
//! clients. Timers run on tokio's paused clock, so budget-length waits
//! complete instantly and deterministically.

use std::sync::Arc;

use alloy_primitives::{Address, Bytes, B256, U256};
use traverse_common::shutdown::{Shutdown, ShutdownSignal};
use traverse_ethio::{rpc::types::TransferSpec, test_utils::TestEvmClient};
use traverse_indexer_client::test_utils::{test_deposit, test_proof, TestIndexClient};
use traverse_reconciler::{ReconcileConfig, ReconcileErrorKind, ReconcilePhase, Reconciler};

const ORIGIN_TXID: B256 = B256::repeat_byte(0x0B);
const MANUAL_TXID: B256 = B256::repeat_byte(0xC1);
const DEST_ADDR: Address = Address::repeat_byte(0x66);

fn config() -> ReconcileConfig {
    ReconcileConfig {
        mining_timeout_secs: 30,
        readiness_timeout_secs: 300,
        auto_claim_timeout_secs: 60,
        poll_interval_ms: 1_000,
        deposit_page_limit: 100,
    }
}

fn transfer_spec() -> TransferSpec {
    TransferSpec {
        token: Address::ZERO,
        amount: U256::from(1000u64),
        dest_network: 1,
        dest_address: DEST_ADDR,
        metadata: Bytes::new(),
    }
}

fn origin_client() -> Arc<TestEvmClient> {
    Arc::new(TestEvmClient::new().with_bridge_txid(ORIGIN_TXID))
}

fn shutdown() -> Shutdown {
    ShutdownSignal::new().subscribe()
}

fn engine(
    origin: &Arc<TestEvmClient>,
    dest: &Arc<TestEvmClient>,
    index: &Arc<TestIndexClient>,
) -> Reconciler<TestEvmClient, TestEvmClient, TestIndexClient> {
    Reconciler::new(origin.clone(), dest.clone(), index.clone(), config())
}

/// Scenario A: the assistance service claims within budget; the engine
/// returns its hash and never touches the proof endpoint.
#[tokio::test(start_paused = true)]
async fn auto_claim_within_budget() {
    let auto_txid = B256::repeat_byte(0xAA);
    let origin = origin_client();
    let dest = Arc::new(TestEvmClient::new());
    let index = Arc::new(
        TestIndexClient::new(test_deposit(ORIGIN_TXID, DEST_ADDR))
            .ready_after(2)
            .auto_claim(3, auto_txid),
    );

    let claimed = engine(&origin, &dest, &index)
        .submit_and_reconcile(&transfer_spec(), &shutdown())
        .await
        .unwrap();

    assert_eq!(claimed, auto_txid);
    assert_eq!(origin.bridge_count(), 1);
    assert_eq!(index.proof_calls(), 0, "auto path must never fetch a proof");
    assert_eq!(dest.claim_count(), 0, "auto path must not submit a claim");
}

/// Scenario B: no auto-claim appears; the engine fetches a proof, claims
/// manually and returns the manual hash once mined.
#[tokio::test(start_paused = true)]
async fn manual_claim_after_auto_budget() {
    let origin = origin_client();
    let dest = Arc::new(TestEvmClient::new().with_claim_txid(MANUAL_TXID));
    let index = Arc::new(TestIndexClient::new(test_deposit(ORIGIN_TXID, DEST_ADDR)).ready_after(1));

    let claimed = engine(&origin, &dest, &index)
        .submit_and_reconcile(&transfer_spec(), &shutdown())
        .await
        .unwrap();

    assert_eq!(claimed, MANUAL_TXID);
    assert_eq!(index.proof_calls(), 1);
    assert_eq!(dest.claim_count(), 1);

    // Claim arguments come from the indexed record and the fresh proof.
    let claim = dest.last_claim().unwrap();
    assert_eq!(claim.amount, U256::from(1000u64));
    assert_eq!(claim.dest_address, DEST_ADDR);
    let expected = test_proof();
    assert_eq!(
        claim.proof.local_path[0],
        expected.merkle_proof[0].parse::<B256>().unwrap()
    );
    assert_eq!(claim.proof.main_exit_root, expected.main_exit_root);
}

/// Scenario C: the deposit never becomes ready; the attempt times out in
/// the readiness phase without any claim submission of any kind.
#[tokio::test(start_paused = true)]
async fn readiness_timeout_claims_nothing() {
    let origin = origin_client();
    let dest = Arc::new(TestEvmClient::new());
    let index =
        Arc::new(TestIndexClient::new(test_deposit(ORIGIN_TXID, DEST_ADDR)).ready_after(u32::MAX));

    let err = engine(&origin, &dest, &index)
        .submit_and_reconcile(&transfer_spec(), &shutdown())
        .await
        .unwrap_err();

    assert!(matches!(err.kind, ReconcileErrorKind::ReadinessTimeout(_)));
    assert_eq!(err.phase, ReconcilePhase::AwaitingReady);
    assert!(err.deposit.is_some(), "last snapshot should ride along");
    assert_eq!(index.proof_calls(), 0);
    assert_eq!(dest.claim_count(), 0);
}

/// A record that never shows up at all fails in the indexing phase, with no
/// snapshot to report.
#[tokio::test(start_paused = true)]
async fn missing_record_times_out_in_indexing_phase() {
    let origin = origin_client();
    let dest = Arc::new(TestEvmClient::new());
    let index = Arc::new(
        TestIndexClient::new(test_deposit(ORIGIN_TXID, DEST_ADDR)).appear_after(u32::MAX),
    );

    let err = engine(&origin, &dest, &index)
        .submit_and_reconcile(&transfer_spec(), &shutdown())
        .await
        .unwrap_err();

    assert!(matches!(err.kind, ReconcileErrorKind::ReadinessTimeout(_)));
    assert_eq!(err.phase, ReconcilePhase::AwaitingIndex);
    assert!(err.deposit.is_none());
}

/// An auto-claim that only shows up after the budget must not cause a
/// second submission: the engine is already on the manual path.
#[tokio::test(start_paused = true)]
async fn late_auto_claim_does_not_double_submit() {
    let late_txid = B256::repeat_byte(0xAF);
    let origin = origin_client();
    let dest = Arc::new(TestEvmClient::new().with_claim_txid(MANUAL_TXID));
    let index = Arc::new(
        TestIndexClient::new(test_deposit(ORIGIN_TXID, DEST_ADDR))
            .ready_after(0)
            // Far beyond the ~60 polls the auto-claim budget allows.
            .auto_claim(10_000, late_txid),
    );

    let claimed = engine(&origin, &dest, &index)
        .submit_and_reconcile(&transfer_spec(), &shutdown())
        .await
        .unwrap();

    assert_eq!(claimed, MANUAL_TXID, "manual path should win");
    assert_eq!(dest.claim_count(), 1, "exactly one claim submission");
    assert_eq!(index.proof_calls(), 1);
}

/// Proof endpoint refusing a ready deposit terminates the attempt in the
/// manual-claim phase without submitting anything.
#[tokio::test(start_paused = true)]
async fn proof_unavailable_is_terminal() {
    let origin = origin_client();
    let dest = Arc::new(TestEvmClient::new());
    let index = Arc::new(
        TestIndexClient::new(test_deposit(ORIGIN_TXID, DEST_ADDR))
            .ready_after(0)
            .deny_proof(),
    );

    let err = engine(&origin, &dest, &index)
        .submit_and_reconcile(&transfer_spec(), &shutdown())
        .await
        .unwrap_err();

    assert!(matches!(err.kind, ReconcileErrorKind::ProofUnavailable(_)));
    assert_eq!(err.phase, ReconcilePhase::ManualClaim);
    assert_eq!(dest.claim_count(), 0);
}

/// A reverted manual claim is a hard failure of the confirming phase; the
/// engine does not retry it.
#[tokio::test(start_paused = true)]
async fn reverted_manual_claim_fails_confirming() {
    let origin = origin_client();
    let dest = Arc::new(TestEvmClient::new().with_claim_txid(MANUAL_TXID).reverting());
    let index = Arc::new(TestIndexClient::new(test_deposit(ORIGIN_TXID, DEST_ADDR)).ready_after(0));

    let err = engine(&origin, &dest, &index)
        .submit_and_reconcile(&transfer_spec(), &shutdown())
        .await
        .unwrap_err();

    match err.kind {
        ReconcileErrorKind::ClaimTxReverted(txid) => assert_eq!(txid, MANUAL_TXID),
        other => panic!("expected claim revert, got {other:?}"),
    }
    assert_eq!(err.phase, ReconcilePhase::Confirming);
    assert_eq!(dest.claim_count(), 1, "no resubmission after a revert");
}

/// A reverted auto-claim likewise fails the attempt rather than silently
/// switching to the manual path.
#[tokio::test(start_paused = true)]
async fn reverted_auto_claim_does_not_fall_back() {
    let auto_txid = B256::repeat_byte(0xAA);
    let origin = origin_client();
    let dest = Arc::new(TestEvmClient::new().reverting());
    let index = Arc::new(
        TestIndexClient::new(test_deposit(ORIGIN_TXID, DEST_ADDR))
            .ready_after(0)
            .auto_claim(0, auto_txid),
    );

    let err = engine(&origin, &dest, &index)
        .submit_and_reconcile(&transfer_spec(), &shutdown())
        .await
        .unwrap_err();

    assert!(matches!(err.kind, ReconcileErrorKind::ClaimTxReverted(_)));
    assert_eq!(dest.claim_count(), 0, "no manual claim after failed auto-claim");
    assert_eq!(index.proof_calls(), 0);
}

/// The origin transaction reverting fails the attempt in the submitted
/// phase; the index is never consulted.
#[tokio::test(start_paused = true)]
async fn origin_revert_fails_before_indexing() {
    let origin = Arc::new(
        TestEvmClient::new()
            .with_bridge_txid(ORIGIN_TXID)
            .reverting(),
    );
    let dest = Arc::new(TestEvmClient::new());
    let index = Arc::new(TestIndexClient::new(test_deposit(ORIGIN_TXID, DEST_ADDR)));

    let err = engine(&origin, &dest, &index)
        .submit_and_reconcile(&transfer_spec(), &shutdown())
        .await
        .unwrap_err();

    assert!(matches!(err.kind, ReconcileErrorKind::OriginTxFailed(_)));
    assert_eq!(err.phase, ReconcilePhase::Submitted);
    assert_eq!(index.list_calls(), 0);
}

/// An origin transaction that never mines within the budget is also an
/// origin failure, not a confirmation timeout.
#[tokio::test(start_paused = true)]
async fn origin_mining_timeout_fails_before_indexing() {
    let origin = Arc::new(
        TestEvmClient::new()
            .with_bridge_txid(ORIGIN_TXID)
            .never_mining(),
    );
    let dest = Arc::new(TestEvmClient::new());
    let index = Arc::new(TestIndexClient::new(test_deposit(ORIGIN_TXID, DEST_ADDR)));

    let err = engine(&origin, &dest, &index)
        .submit_and_reconcile(&transfer_spec(), &shutdown())
        .await
        .unwrap_err();

    assert!(matches!(err.kind, ReconcileErrorKind::OriginTxFailed(_)));
    assert_eq!(err.phase, ReconcilePhase::Submitted);
}

/// Shutdown signalled up front cancels the attempt promptly.
#[tokio::test(start_paused = true)]
async fn cancellation_stops_the_attempt() {
    let origin = origin_client();
    let dest = Arc::new(TestEvmClient::new());
    let index = Arc::new(TestIndexClient::new(test_deposit(ORIGIN_TXID, DEST_ADDR)));

    let signal = ShutdownSignal::new();
    signal.send();

    let err = engine(&origin, &dest, &index)
        .submit_and_reconcile(&transfer_spec(), &signal.subscribe())
        .await
        .unwrap_err();

    assert!(matches!(err.kind, ReconcileErrorKind::Cancelled));
    assert_eq!(dest.claim_count(), 0);
}

/// Transient index outages inside the readiness loop are retried, not
/// surfaced.
#[tokio::test(start_paused = true)]
async fn transient_index_errors_are_swallowed() {
    let origin = origin_client();
    let dest = Arc::new(TestEvmClient::new().with_claim_txid(MANUAL_TXID));
    let index = Arc::new(
        TestIndexClient::new(test_deposit(ORIGIN_TXID, DEST_ADDR))
            .ready_after(1)
            .fail_lists(2),
    );

    let claimed = engine(&origin, &dest, &index)
        .submit_and_reconcile(&transfer_spec(), &shutdown())
        .await
        .unwrap();

    assert_eq!(claimed, MANUAL_TXID);
}
