//! Read client for the off-chain indexing / claim-assistance service.
//!
//! The service observes both chains and exposes deposit records and Merkle
//! proofs over a small HTTP query surface. This crate only consumes that
//! surface; the engine never writes to the indexer.

pub mod client;
pub mod error;
pub mod test_utils;
pub mod traits;
pub mod types;

pub use client::{IndexClient, DEFAULT_HTTP_TIMEOUT};
pub use error::{ClientError, ClientResult};
pub use traits::DepositIndex;
pub use types::{BridgesResponse, Deposit, ProofResponse};
