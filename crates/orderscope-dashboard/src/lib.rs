//! orderscope-dashboard - HTTP serving layer for the aggregated views.
//!
//! Serves the board over three surfaces:
//!
//! - REST: `/api/markets`, `/api/builders`, `/api/stats`, `/api/funding`,
//!   `/api/vaults`, and `/api/snapshot` for everything at once
//! - WebSocket: `/ws`, full snapshot on connect, rebroadcast when a poller
//!   publishes, stale-view alerts on refresh failures
//! - Prometheus: `/metrics`
//!
//! Responses use the same `{success, data, timestamp}` envelope the
//! upstream API uses, so clients can share decoding. A view that has never
//! loaded serves 503; a view with stale data keeps serving it with the
//! error noted in the snapshot document.

mod broadcast;
mod config;
mod server;
mod types;

pub use config::DashboardConfig;
pub use server::run_server;
pub use types::{collect_snapshot, ApiResponse, DashboardMessage, SnapshotDocument, ViewDocument};
