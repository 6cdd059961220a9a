//! Derived view rows served by the dashboard.
//!
//! These are the reshaped forms of the upstream records: renamed fields,
//! USD conversions, and 24h change math. Construction and sorting live in
//! orderscope-feed; the types live here so the dashboard can serialize them
//! without depending on the feed.

use serde::{Deserialize, Serialize};

/// One market in the markets view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketRow {
    pub symbol: String,
    pub index_price: f64,
    pub mark_price: f64,
    /// Fractional 24h change: (mark - open) / open. Zero when either side
    /// is missing.
    pub change_24h: f64,
    /// 24h USD notional volume.
    pub volume_24h: f64,
    /// Open interest converted to USD (base quantity x mark-or-index price).
    pub open_interest_usd: f64,
    pub funding_rate: f64,
}

/// One builder (broker) in the builders view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuilderRow {
    pub broker_id: String,
    pub broker_name: String,
    pub volume_30d: f64,
    pub volume_7d: f64,
    pub volume_24h: f64,
    pub volume_ytd: f64,
    pub volume_ltd: f64,
}

/// Network-wide headline stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkStats {
    /// Lifetime volume summed across all brokers (USD).
    pub total_volume: f64,
    /// Brokers with any volume in the last 30 days.
    pub builders: u64,
    /// Listed market count.
    pub markets: u64,
}
