use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default value for `mining_timeout_secs`.
const DEFAULT_MINING_TIMEOUT_SECS: u64 = 180;

/// Default value for `readiness_timeout_secs`. Readiness typically takes up
/// to a couple of hours on the slow direction of the bridge.
const DEFAULT_READINESS_TIMEOUT_SECS: u64 = 120 * 60;

/// Default value for `auto_claim_timeout_secs`. The assistance service
/// normally claims within minutes once a deposit is ready.
const DEFAULT_AUTO_CLAIM_TIMEOUT_SECS: u64 = 15 * 60;

/// Default value for `poll_interval_ms`.
const DEFAULT_POLL_INTERVAL_MS: u64 = 60_000;

/// Default value for `deposit_page_limit`.
const DEFAULT_DEPOSIT_PAGE_LIMIT: u64 = 100;

/// Budgets and pacing for one reconciliation attempt.
///
/// Readiness and auto-claim carry independent budgets: the indexer's
/// promotion to ready and its best-effort auto-claim are different
/// guarantees with different expected latencies, and collapsing them would
/// either delay the manual fallback far too long or abandon a
/// slow-but-working auto-claim far too early.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// How long a broadcast transaction may take to mine, on either chain,
    /// before the wait is abandoned.
    #[serde(default = "default_mining_timeout")]
    pub mining_timeout_secs: u64,

    /// Budget for the deposit to be indexed and become ready for claim.
    #[serde(default = "default_readiness_timeout")]
    pub readiness_timeout_secs: u64,

    /// Budget for the assistance service to produce an auto-claim before we
    /// fall back to claiming manually.
    #[serde(default = "default_auto_claim_timeout")]
    pub auto_claim_timeout_secs: u64,

    /// Interval between indexer polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,

    /// Page size when scanning deposits for an address. Large enough to
    /// cover realistic concurrent-deposit counts; the service has no
    /// hash-based lookup.
    #[serde(default = "default_page_limit")]
    pub deposit_page_limit: u64,
}

impl ReconcileConfig {
    pub fn mining_timeout(&self) -> Duration {
        Duration::from_secs(self.mining_timeout_secs)
    }

    pub fn readiness_timeout(&self) -> Duration {
        Duration::from_secs(self.readiness_timeout_secs)
    }

    pub fn auto_claim_timeout(&self) -> Duration {
        Duration::from_secs(self.auto_claim_timeout_secs)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            mining_timeout_secs: DEFAULT_MINING_TIMEOUT_SECS,
            readiness_timeout_secs: DEFAULT_READINESS_TIMEOUT_SECS,
            auto_claim_timeout_secs: DEFAULT_AUTO_CLAIM_TIMEOUT_SECS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            deposit_page_limit: DEFAULT_DEPOSIT_PAGE_LIMIT,
        }
    }
}

fn default_mining_timeout() -> u64 {
    DEFAULT_MINING_TIMEOUT_SECS
}

fn default_readiness_timeout() -> u64 {
    DEFAULT_READINESS_TIMEOUT_SECS
}

fn default_auto_claim_timeout() -> u64 {
    DEFAULT_AUTO_CLAIM_TIMEOUT_SECS
}

fn default_poll_interval() -> u64 {
    DEFAULT_POLL_INTERVAL_MS
}

fn default_page_limit() -> u64 {
    DEFAULT_DEPOSIT_PAGE_LIMIT
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_load() {
        let config_string = r#"
            mining_timeout_secs = 60
            readiness_timeout_secs = 3600
        "#;

        let config = toml::from_str::<ReconcileConfig>(config_string)
            .expect("should be able to load TOML config");

        assert_eq!(config.mining_timeout(), Duration::from_secs(60));
        assert_eq!(config.readiness_timeout(), Duration::from_secs(3600));
        // Unset knobs fall back to defaults.
        assert_eq!(
            config.auto_claim_timeout_secs,
            DEFAULT_AUTO_CLAIM_TIMEOUT_SECS
        );
        assert_eq!(config.deposit_page_limit, DEFAULT_DEPOSIT_PAGE_LIMIT);
    }

    #[test]
    fn budgets_are_ordered_by_default() {
        let config = ReconcileConfig::default();
        assert!(config.readiness_timeout() > config.auto_claim_timeout());
    }
}
