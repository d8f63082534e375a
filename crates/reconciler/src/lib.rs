//! Deposit-claim reconciliation engine.
//!
//! Drives one cross-chain transfer from origin-chain submission to a
//! confirmed destination-chain claim: wait for the deposit to mine, wait
//! for the indexer to mark it ready, watch for the assistance service's
//! auto-claim for a bounded window, otherwise fetch a Merkle proof and
//! claim manually, then confirm whichever claim transaction results.
//!
//! The engine is a library: it never terminates the process, every wait is
//! bounded and cancellable, and failures come back as typed errors carrying
//! the failing phase and the last observed deposit record.

pub mod config;
pub mod engine;
pub mod errors;
pub mod state;

pub use config::ReconcileConfig;
pub use engine::Reconciler;
pub use errors::{ReconcileError, ReconcileErrorKind};
pub use state::ReconcilePhase;
