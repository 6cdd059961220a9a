//! Polling configuration.

use serde::{Deserialize, Serialize};

/// Poll intervals and the builder roster.
///
/// Intervals default to the upstream's own cache lifetimes: tickers move
/// fast, volume totals slowly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Markets view refresh interval (seconds). Default: 30.
    #[serde(default = "default_markets_secs")]
    pub markets_secs: u64,
    /// Builders view refresh interval (seconds). Default: 60.
    #[serde(default = "default_builders_secs")]
    pub builders_secs: u64,
    /// Network stats refresh interval (seconds). Default: 300.
    #[serde(default = "default_stats_secs")]
    pub stats_secs: u64,
    /// Funding rates refresh interval (seconds). Default: 60.
    #[serde(default = "default_funding_secs")]
    pub funding_secs: u64,
    /// Vaults refresh interval (seconds). Default: 60.
    #[serde(default = "default_vaults_secs")]
    pub vaults_secs: u64,
    /// Delay between per-broker requests within a sweep (milliseconds).
    /// Default: 100.
    #[serde(default = "default_sweep_spacing_ms")]
    pub sweep_spacing_ms: u64,
    /// Broker ids swept for the builders view.
    #[serde(default = "default_builder_roster")]
    pub builder_roster: Vec<String>,
}

fn default_markets_secs() -> u64 {
    30
}

fn default_builders_secs() -> u64 {
    60
}

fn default_stats_secs() -> u64 {
    300
}

fn default_funding_secs() -> u64 {
    60
}

fn default_vaults_secs() -> u64 {
    60
}

fn default_sweep_spacing_ms() -> u64 {
    100
}

fn default_builder_roster() -> Vec<String> {
    [
        "orderly",
        "raydium",
        "kodiak",
        "aden",
        "woofi_pro",
        "aegisdex",
        "berrie",
        "vooi",
        "logx",
        "quick_perps",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            markets_secs: default_markets_secs(),
            builders_secs: default_builders_secs(),
            stats_secs: default_stats_secs(),
            funding_secs: default_funding_secs(),
            vaults_secs: default_vaults_secs(),
            sweep_spacing_ms: default_sweep_spacing_ms(),
            builder_roster: default_builder_roster(),
        }
    }
}
