//! WebSocket broadcast functionality.
//!
//! The broadcaster ticks at a fixed interval but only sends when the board
//! changed since the last tick, so idle periods stay quiet. A view whose
//! refresh starts failing additionally triggers a one-shot stale alert.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::broadcast;
use tracing::{debug, trace};

use orderscope_feed::Board;

use crate::types::{collect_snapshot, DashboardMessage};

/// Run the broadcaster task.
pub async fn run_broadcaster(board: Arc<Board>, tx: broadcast::Sender<String>, interval_ms: u64) {
    let mut interval = tokio::time::interval(Duration::from_millis(interval_ms));

    let mut last_version = board.version();
    // Track which views were already erroring to alert only on transitions.
    let mut was_stale = [false; 5];

    loop {
        interval.tick().await;

        let version = board.version();
        if version == last_version {
            continue;
        }
        last_version = version;

        let snapshot = collect_snapshot(&board);

        let view_errors = [
            ("markets", snapshot.markets.last_error.clone()),
            ("builders", snapshot.builders.last_error.clone()),
            ("stats", snapshot.stats.last_error.clone()),
            ("funding", snapshot.funding.last_error.clone()),
            ("vaults", snapshot.vaults.last_error.clone()),
        ];

        for (i, (view, error)) in view_errors.into_iter().enumerate() {
            match error {
                Some(error) if !was_stale[i] => {
                    was_stale[i] = true;
                    let alert = DashboardMessage::ViewStale {
                        timestamp_ms: Utc::now().timestamp_millis(),
                        view: view.to_string(),
                        error,
                    };
                    if let Ok(json) = serde_json::to_string(&alert) {
                        let _ = tx.send(json);
                    }
                }
                Some(_) => {}
                None => was_stale[i] = false,
            }
        }

        match serde_json::to_string(&DashboardMessage::Snapshot(snapshot)) {
            Ok(json) => match tx.send(json) {
                Ok(n) => trace!(receivers = n, "Broadcast snapshot sent"),
                // No receivers is normal when no clients are connected.
                Err(_) => trace!("No WebSocket receivers connected"),
            },
            Err(e) => debug!(error = %e, "Failed to serialize snapshot"),
        }
    }
}
