//! Mined-transaction confirmation, shared by the deposit submission path
//! and both claim paths.

use std::time::Duration;

use alloy::primitives::B256;
use thiserror::Error;
use tokio::time::{interval, Instant};
use tracing::*;
use traverse_common::shutdown::Shutdown;

use crate::rpc::{traits::Reader, types::TxReceipt};

/// Fixed interval between receipt polls.
pub const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Outcome of a wait that did not end in a successful receipt.
///
/// The cases mean different things to callers: a revert is a hard failure
/// of that specific transaction, a timeout is inconclusive (the transaction
/// may still mine later), and a cancellation says nothing about the
/// transaction at all.
#[derive(Debug, Error)]
pub enum ConfirmError {
    #[error("transaction {txid} not mined within {timeout:?}")]
    Timeout { txid: B256, timeout: Duration },

    #[error("transaction {txid} reverted")]
    Reverted { txid: B256, receipt: TxReceipt },

    #[error("wait for transaction {txid} cancelled")]
    Cancelled { txid: B256 },
}

/// Polls `client` until `txid` is mined, `timeout` elapses or shutdown is
/// signalled.
///
/// A missing receipt and a transport error are both treated as not yet
/// mined and retried; only a mined receipt, the deadline or cancellation
/// end the wait.
pub async fn wait_mined(
    client: &impl Reader,
    txid: B256,
    timeout: Duration,
    shutdown: &Shutdown,
) -> Result<TxReceipt, ConfirmError> {
    let deadline = Instant::now() + timeout;
    let mut shutdown = shutdown.clone();
    let mut ticker = interval(RECEIPT_POLL_INTERVAL);

    loop {
        if shutdown.should_shutdown() {
            return Err(ConfirmError::Cancelled { txid });
        }

        tokio::select! {
            _ = ticker.tick() => {}
            _ = shutdown.wait_for_shutdown() => {
                return Err(ConfirmError::Cancelled { txid });
            }
        }

        match client.transaction_receipt(txid).await {
            Ok(Some(receipt)) if receipt.success => {
                debug!(%txid, "transaction successfully mined");
                return Ok(receipt);
            }
            Ok(Some(receipt)) => {
                return Err(ConfirmError::Reverted { txid, receipt });
            }
            Ok(None) => {
                trace!(%txid, "transaction not yet mined");
            }
            Err(err) => {
                // Transient by policy: the deadline, not the error, ends
                // the wait.
                debug!(%txid, %err, "receipt retrieval failed");
            }
        }

        if Instant::now() >= deadline {
            return Err(ConfirmError::Timeout { txid, timeout });
        }
    }
}

#[cfg(test)]
mod tests {
    use traverse_common::shutdown::ShutdownSignal;

    use super::*;
    use crate::test_utils::TestEvmClient;

    const TXID: B256 = B256::repeat_byte(0x42);

    fn shutdown() -> Shutdown {
        ShutdownSignal::new().subscribe()
    }

    #[tokio::test(start_paused = true)]
    async fn returns_receipt_once_mined() {
        let client = TestEvmClient::new().mine_after(3);

        let receipt = wait_mined(&client, TXID, Duration::from_secs(30), &shutdown())
            .await
            .unwrap();
        assert!(receipt.success);
        assert_eq!(receipt.txid, TXID);
        assert_eq!(client.receipt_polls(), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn reverted_receipt_is_hard_failure() {
        let client = TestEvmClient::new().reverting();

        match wait_mined(&client, TXID, Duration::from_secs(30), &shutdown()).await {
            Err(ConfirmError::Reverted { txid, receipt }) => {
                assert_eq!(txid, TXID);
                assert!(!receipt.success);
            }
            other => panic!("expected revert, got {other:?}"),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_without_receipt() {
        let client = TestEvmClient::new().never_mining();

        match wait_mined(&client, TXID, Duration::from_secs(5), &shutdown()).await {
            Err(ConfirmError::Timeout { txid, .. }) => assert_eq!(txid, TXID),
            other => panic!("expected timeout, got {other:?}"),
        }
        // Polls once immediately, then once per interval until the deadline.
        assert!(client.receipt_polls() >= 5);
    }

    #[tokio::test(start_paused = true)]
    async fn transport_errors_are_retried() {
        let client = TestEvmClient::new().fail_first(2);

        let receipt = wait_mined(&client, TXID, Duration::from_secs(30), &shutdown())
            .await
            .unwrap();
        assert!(receipt.success);
        assert_eq!(client.receipt_polls(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_unblocks_wait() {
        let client = TestEvmClient::new().never_mining();
        let signal = ShutdownSignal::new();
        signal.send();

        match wait_mined(
            &client,
            TXID,
            Duration::from_secs(3600),
            &signal.subscribe(),
        )
        .await
        {
            Err(ConfirmError::Cancelled { txid }) => assert_eq!(txid, TXID),
            other => panic!("expected cancellation, got {other:?}"),
        }
    }
}
