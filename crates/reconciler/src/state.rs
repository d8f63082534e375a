use std::fmt;

use alloy_primitives::B256;
use tokio::time::Instant;
use traverse_indexer_client::Deposit;

use crate::errors::{ReconcileError, ReconcileErrorKind};

/// Phase of one reconciliation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconcilePhase {
    /// Origin deposit transaction accepted, awaiting its receipt.
    Submitted,
    /// Origin transaction mined, awaiting a matching indexer record.
    AwaitingIndex,
    /// Record found, awaiting the ready-for-claim flag.
    AwaitingReady,
    /// Record ready, watching for an assistance-service claim.
    AwaitingAutoClaim,
    /// Auto-claim budget exhausted, claiming ourselves.
    ManualClaim,
    /// A claim transaction is known, awaiting its receipt.
    Confirming,
    /// Terminal: the claim mined successfully.
    Claimed,
    /// Terminal: the attempt failed.
    Failed,
}

impl fmt::Display for ReconcilePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Submitted => "submitted",
            Self::AwaitingIndex => "awaiting-index",
            Self::AwaitingReady => "awaiting-ready",
            Self::AwaitingAutoClaim => "awaiting-auto-claim",
            Self::ManualClaim => "manual-claim",
            Self::Confirming => "confirming",
            Self::Claimed => "claimed",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// In-memory state the engine owns for one attempt. Never persisted; a
/// retried attempt starts from scratch.
#[derive(Debug)]
pub(crate) struct Attempt {
    pub(crate) phase: ReconcilePhase,
    pub(crate) started_at: Instant,
    /// Most recent indexer record observed for this deposit.
    pub(crate) last_seen: Option<Deposit>,
    /// Guards against submitting a second manual claim within this attempt.
    pub(crate) manual_submitted: bool,
    pub(crate) claim_txid: Option<B256>,
}

impl Attempt {
    pub(crate) fn new() -> Self {
        Self {
            phase: ReconcilePhase::Submitted,
            started_at: Instant::now(),
            last_seen: None,
            manual_submitted: false,
            claim_txid: None,
        }
    }

    pub(crate) fn elapsed(&self) -> std::time::Duration {
        self.started_at.elapsed()
    }

    /// Terminates the attempt, capturing the phase it failed in and the
    /// last deposit snapshot for the caller.
    pub(crate) fn fail(&mut self, kind: ReconcileErrorKind) -> ReconcileError {
        let phase = self.phase;
        self.phase = ReconcilePhase::Failed;
        ReconcileError {
            kind,
            phase,
            elapsed: self.elapsed(),
            deposit: self.last_seen.clone(),
        }
    }
}
