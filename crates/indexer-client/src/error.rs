use thiserror::Error;

/// Alias for results produced by the index client.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors talking to the indexer service.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Transport-level failure, retry might help.
    #[error("request failed: {0}")]
    Transport(String),

    /// Service answered with a non-success status.
    #[error("indexer returned status {0}: {1}")]
    Status(u16, String),

    /// The service cannot supply a proof for the deposit. Not retryable
    /// within one reconciliation attempt.
    #[error("proof unavailable for deposit {deposit_cnt} on network {network_id}: {reason}")]
    ProofUnavailable {
        network_id: u32,
        deposit_cnt: u64,
        reason: String,
    },

    /// Error parsing the response body.
    #[error("malformed response: {0}")]
    Parse(String),

    /// Base URL or parameters could not form a valid request.
    #[error("could not build request: {0}")]
    Request(String),
}
