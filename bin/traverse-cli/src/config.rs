use std::path::Path;

use alloy::primitives::Address;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use traverse_indexer_client::DEFAULT_HTTP_TIMEOUT;
use traverse_reconciler::ReconcileConfig;

/// Connection details for one chain and its bridge deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// HTTP RPC endpoint.
    pub http_url: String,

    /// Address of the bridge contract on this chain.
    pub bridge_address: Address,

    /// Bridge-level network id of this chain.
    pub network_id: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexerConfig {
    /// Base URL of the indexer's query API.
    pub url: String,

    /// Per-request read timeout.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConfig {
    /// Hex-encoded private key used to sign on both chains.
    pub private_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub origin: ChainConfig,
    pub destination: ChainConfig,
    pub indexer: IndexerConfig,
    pub wallet: WalletConfig,
    #[serde(default)]
    pub reconciler: ReconcileConfig,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }
}

fn default_http_timeout() -> u64 {
    DEFAULT_HTTP_TIMEOUT.as_secs()
}
