//! Error types for the chain RPC client.

use thiserror::Error;

/// Alias for the result type returned by chain clients.
pub type ClientResult<T> = Result<T, ClientError>;

/// The error type for chain RPC interactions.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network/transport error, retry might help.
    #[error("transport: {0}")]
    Transport(String),

    /// The node rejected the call or transaction.
    #[error("rpc: {0}")]
    Rpc(String),

    /// Error decoding a response.
    #[error("parse: {0}")]
    Parse(String),

    /// Endpoint or signer configuration problem, not retryable.
    #[error("config: {0}")]
    Config(String),
}
