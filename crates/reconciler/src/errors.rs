//! Typed failures of a reconciliation attempt.

use std::time::Duration;

use alloy_primitives::B256;
use thiserror::Error;
use traverse_indexer_client::{ClientError as IndexClientError, Deposit};
use traverse_proof::ProofError;

use crate::state::ReconcilePhase;

/// Why a reconciliation attempt stopped.
#[derive(Debug, Error)]
pub enum ReconcileErrorKind {
    /// The origin deposit transaction reverted, was rejected, or did not
    /// mine within the mining budget.
    #[error("origin transaction failed: {0}")]
    OriginTxFailed(String),

    /// The deposit never became ready for claim within its budget.
    #[error("deposit not ready for claim within {0:?}")]
    ReadinessTimeout(Duration),

    /// A claim transaction mined but reverted. In the manual path this can
    /// be benign (an auto-claim may have raced in just before ours), so
    /// callers should re-check the deposit record before treating it as a
    /// loss.
    #[error("claim transaction {0} reverted")]
    ClaimTxReverted(B256),

    /// A claim transaction was not mined within the confirmation budget.
    /// Inconclusive: the transaction may still mine. Warrants operator
    /// attention, not blind resubmission of the same hash.
    #[error("claim transaction {0} not confirmed in time")]
    ConfirmationTimeout(B256),

    /// The indexer could not supply a proof for a ready deposit. Not
    /// retried within the attempt.
    #[error("proof fetch failed: {0}")]
    ProofUnavailable(#[from] IndexClientError),

    /// The indexer's proof did not convert to the fixed-depth form the
    /// destination verifier expects.
    #[error(transparent)]
    MalformedProof(#[from] ProofError),

    /// Transport-level failure outside any polling loop (polling loops
    /// swallow and retry these until their own deadline).
    #[error("transport: {0}")]
    Transport(String),

    /// Shutdown was signalled mid-attempt.
    #[error("attempt cancelled")]
    Cancelled,
}

/// A failed reconciliation attempt, with enough context to tell "indexer
/// slow" apart from "claim actually reverted on-chain".
#[derive(Debug, Error)]
#[error("reconcile failed during {phase} after {elapsed:?}: {kind}")]
pub struct ReconcileError {
    pub kind: ReconcileErrorKind,
    /// Phase the attempt was in when it stopped.
    pub phase: ReconcilePhase,
    /// Time since the attempt started.
    pub elapsed: Duration,
    /// Last deposit record observed before the failure, if any.
    pub deposit: Option<Deposit>,
}
