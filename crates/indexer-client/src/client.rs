use std::time::Duration;

use alloy_primitives::Address;
use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::*;

use crate::{
    error::{ClientError, ClientResult},
    traits::DepositIndex,
    types::{BridgesResponse, Deposit, ProofResponse},
};

/// Default per-request read timeout. This bounds a single blocking read;
/// it is deliberately not part of the engine's reconciliation budgets.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// An `async` read client for the indexer's HTTP query surface.
#[derive(Debug, Clone)]
pub struct IndexClient {
    base_url: Url,
    client: Client,
}

impl IndexClient {
    /// Creates a new [`IndexClient`] against the given base URL with a
    /// per-request read timeout.
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let base_url = base_url
            .parse::<Url>()
            .map_err(|e| ClientError::Request(format!("invalid base url: {e}")))?;

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Request(format!("could not build client: {e}")))?;

        trace!(url = %base_url, "created index client");

        Ok(Self { base_url, client })
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| ClientError::Request(e.to_string()))
    }
}

#[async_trait]
impl DepositIndex for IndexClient {
    async fn deposits_for_address(
        &self,
        address: Address,
        offset: u64,
        limit: u64,
    ) -> ClientResult<Vec<Deposit>> {
        let url = self.endpoint(&format!("bridges/{address}"))?;
        trace!(%address, %offset, %limit, "querying deposits");

        let resp = self
            .client
            .get(url)
            .query(&[("offset", offset), ("limit", limit)])
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Status(status.as_u16(), body));
        }

        let page = resp
            .json::<BridgesResponse>()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))?;
        Ok(page.deposits)
    }

    async fn merkle_proof(
        &self,
        network_id: u32,
        deposit_cnt: u64,
    ) -> ClientResult<ProofResponse> {
        let url = self.endpoint("merkle-proof")?;
        trace!(%network_id, %deposit_cnt, "querying merkle proof");

        let resp = self
            .client
            .get(url)
            .query(&[("net_id", u64::from(network_id)), ("deposit_cnt", deposit_cnt)])
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            // The service answers an error status while the deposit is not
            // yet provable; surface that distinctly from transport trouble.
            let reason = resp.text().await.unwrap_or_default();
            return Err(ClientError::ProofUnavailable {
                network_id,
                deposit_cnt,
                reason: format!("status {status}: {reason}"),
            });
        }

        resp.json::<ProofResponse>()
            .await
            .map_err(|e| ClientError::Parse(e.to_string()))
    }
}
