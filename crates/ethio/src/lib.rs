//! Input-output with EVM chains: bridge contract submission, receipt
//! polling and balance reads.

pub mod confirm;
pub mod rpc;
pub mod test_utils;

pub use confirm::{wait_mined, ConfirmError, RECEIPT_POLL_INTERVAL};
pub use rpc::{ClientError, ClientResult, EvmClient};
