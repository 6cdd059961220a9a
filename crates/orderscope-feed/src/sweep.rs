//! Builder roster sweep.
//!
//! Fetches per-broker volume statistics one roster entry at a time, with a
//! spacing delay between requests to stay under the upstream rate limit.
//! Failure is contained per item: a broker whose fetch errors or comes back
//! empty is tagged as such and the sweep moves on. The sweep itself never
//! fails.

use std::time::Duration;

use tracing::{debug, warn};

use orderscope_client::{ClientError, OrderlyClient};
use orderscope_core::records::BrokerVolumeStats;

/// Outcome of one roster entry.
pub struct SweepItem {
    pub broker_id: String,
    /// `Ok(Some)` = stats fetched; `Ok(None)` = upstream had nothing for
    /// this broker (skip it); `Err` = this item's fetch failed.
    pub outcome: Result<Option<BrokerVolumeStats>, ClientError>,
}

impl SweepItem {
    /// Label for metrics: "ok", "skipped", or "failed".
    pub fn outcome_label(&self) -> &'static str {
        match &self.outcome {
            Ok(Some(_)) => "ok",
            Ok(None) => "skipped",
            Err(_) => "failed",
        }
    }
}

/// Sweep the roster, one fetch per broker, `spacing` apart.
///
/// The roster is an explicit argument so callers can sweep arbitrary
/// fixtures; ordering of the result matches the roster.
pub async fn sweep_builder_volumes(
    client: &OrderlyClient,
    roster: &[String],
    spacing: Duration,
) -> Vec<SweepItem> {
    let mut items = Vec::with_capacity(roster.len());

    for (i, broker_id) in roster.iter().enumerate() {
        if i > 0 && !spacing.is_zero() {
            tokio::time::sleep(spacing).await;
        }

        let outcome = client.broker_volume(broker_id).await;
        match &outcome {
            Ok(Some(_)) => {}
            Ok(None) => debug!(broker_id, "No volume data for broker, skipping"),
            Err(e) => warn!(broker_id, error = %e, "Broker volume fetch failed, continuing sweep"),
        }

        items.push(SweepItem {
            broker_id: broker_id.clone(),
            outcome,
        });
    }

    items
}
