//! Core domain types for the orderscope analytics service.
//!
//! This crate provides the data types shared across the workspace:
//! - Upstream record types deserialized from Orderly API payloads
//!   (`FuturesTicker`, `BrokerVolumeStats`, `VaultInfo`, ...)
//! - Derived view rows served by the dashboard (`MarketRow`, `BuilderRow`,
//!   `NetworkStats`)
//! - Display formatting helpers (`format_usd`, `format_percent`, ...)
//!
//! No I/O happens here; everything is plain data.

pub mod format;
pub mod records;
pub mod views;

pub use records::{
    AggregateBrokerStats, AggregateVolumeStats, BrokerName, BrokerVolumeStats, FundingRate,
    FuturesTicker, SupportedChain, SymbolInfo, VaultInfo,
};
pub use views::{BuilderRow, MarketRow, NetworkStats};
