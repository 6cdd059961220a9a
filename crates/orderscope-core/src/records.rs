//! Upstream record types.
//!
//! These mirror the row shapes returned inside the `data` payload of the
//! Orderly public API. Numeric fields default to zero when absent; the
//! upstream omits fields for thin markets rather than sending null.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One row of `/v1/public/futures`.
///
/// `volume_24h` is quantity in base currency; `amount_24h` is the USD
/// notional and is what the views display. `open_interest` is in base
/// currency and must be multiplied by a price to get USD.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuturesTicker {
    pub symbol: String,
    #[serde(default)]
    pub index_price: f64,
    #[serde(default)]
    pub mark_price: f64,
    #[serde(default)]
    pub est_funding_rate: f64,
    #[serde(default)]
    pub last_funding_rate: f64,
    #[serde(default)]
    pub next_funding_time: i64,
    #[serde(default)]
    pub open_interest: f64,
    #[serde(rename = "24h_open", default)]
    pub open_24h: f64,
    #[serde(rename = "24h_close", default)]
    pub close_24h: f64,
    #[serde(rename = "24h_high", default)]
    pub high_24h: f64,
    #[serde(rename = "24h_low", default)]
    pub low_24h: f64,
    #[serde(rename = "24h_volume", default)]
    pub volume_24h: f64,
    #[serde(rename = "24h_amount", default)]
    pub amount_24h: f64,
}

/// One row of `/v1/public/info` (instrument metadata).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub symbol: String,
    #[serde(default)]
    pub quote_min: f64,
    #[serde(default)]
    pub quote_max: f64,
    #[serde(default)]
    pub quote_tick: f64,
    #[serde(default)]
    pub base_min: f64,
    #[serde(default)]
    pub base_max: f64,
    #[serde(default)]
    pub base_tick: f64,
    #[serde(default)]
    pub min_notional: f64,
    #[serde(default)]
    pub created_time: i64,
}

/// One row of `/v1/public/broker/name`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerName {
    pub broker_id: String,
    pub broker_name: String,
}

/// Per-broker volume statistics from `/v1/public/volume/stats?broker_id=...`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrokerVolumeStats {
    #[serde(default)]
    pub perp_volume_last_1_day: f64,
    #[serde(default)]
    pub perp_volume_last_7_days: f64,
    #[serde(default)]
    pub perp_volume_last_30_days: f64,
    #[serde(default)]
    pub perp_volume_ytd: f64,
    #[serde(default)]
    pub perp_volume_ltd: f64,
}

/// Aggregate volume statistics from `/v1/public/volume/stats` (no broker_id).
///
/// The aggregate endpoint keys brokers by id and uses shorter field names
/// than the per-broker variant.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateVolumeStats {
    #[serde(default)]
    pub brokers: HashMap<String, AggregateBrokerStats>,
}

/// Volume figures for a single broker inside [`AggregateVolumeStats`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AggregateBrokerStats {
    #[serde(default)]
    pub volume_30d: f64,
    #[serde(default)]
    pub volume_ltd: f64,
}

/// One row of `/v1/public/funding_rates`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundingRate {
    pub symbol: String,
    #[serde(default)]
    pub est_funding_rate: f64,
    #[serde(default)]
    pub last_funding_rate: f64,
    #[serde(default)]
    pub next_funding_time: i64,
}

/// One row of the strategy-vault info endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultInfo {
    pub vault_id: String,
    pub vault_name: String,
    /// "protocol" or "community".
    #[serde(default)]
    pub vault_type: String,
    #[serde(default)]
    pub description: String,
    /// Strategy provider name.
    #[serde(default)]
    pub sp_name: String,
    #[serde(default)]
    pub tvl: f64,
    #[serde(default)]
    pub lifetime_apy: f64,
    #[serde(rename = "30d_apy", default)]
    pub apy_30d: f64,
    #[serde(default)]
    pub vault_lifetime_net_pnl: f64,
    /// Depositor count.
    #[serde(default)]
    pub lp_counts: u64,
    /// Age in days.
    #[serde(default)]
    pub vault_age: u64,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub performance_fee_rate: f64,
    #[serde(default)]
    pub supported_chains: Vec<SupportedChain>,
}

/// Chain entry inside [`VaultInfo::supported_chains`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupportedChain {
    pub chain_id: String,
    pub chain_name: String,
}
