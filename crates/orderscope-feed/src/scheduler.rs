//! Polling scheduler: one interval loop per view.
//!
//! Polling is a separate concern from the fetch retry contract. A loop
//! tick performs one refresh: fetch, aggregate, publish. The three-way
//! fetch outcome maps onto the board as publish / record-no-data /
//! record-error; the previous snapshot always survives a bad tick.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{info, warn};

use orderscope_client::{ClientError, OrderlyClient};
use orderscope_telemetry::Metrics;

use crate::aggregate::{
    build_builder_rows, build_market_rows, build_network_stats, sort_vaults,
};
use crate::board::{Board, ViewCell};
use crate::config::PollConfig;
use crate::sweep::sweep_builder_volumes;

/// Spawn all view loops. Each loop ticks immediately on startup, then at
/// its configured period.
pub fn spawn_pollers(
    client: Arc<OrderlyClient>,
    board: Arc<Board>,
    config: &PollConfig,
) -> Vec<JoinHandle<()>> {
    let mut handles = Vec::new();

    {
        let (client, board) = (client.clone(), board.clone());
        let period = Duration::from_secs(config.markets_secs);
        handles.push(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                refresh_markets(&client, &board).await;
            }
        }));
    }

    {
        let (client, board) = (client.clone(), board.clone());
        let period = Duration::from_secs(config.builders_secs);
        let roster = config.builder_roster.clone();
        let spacing = Duration::from_millis(config.sweep_spacing_ms);
        handles.push(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                refresh_builders(&client, &board, &roster, spacing).await;
            }
        }));
    }

    {
        let (client, board) = (client.clone(), board.clone());
        let period = Duration::from_secs(config.stats_secs);
        handles.push(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                refresh_stats(&client, &board).await;
            }
        }));
    }

    {
        let (client, board) = (client.clone(), board.clone());
        let period = Duration::from_secs(config.funding_secs);
        handles.push(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                refresh_funding(&client, &board).await;
            }
        }));
    }

    {
        let period = Duration::from_secs(config.vaults_secs);
        handles.push(tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            loop {
                interval.tick().await;
                refresh_vaults(&client, &board).await;
            }
        }));
    }

    info!(loops = handles.len(), "View pollers started");
    handles
}

/// Refresh the markets view.
pub async fn refresh_markets(client: &OrderlyClient, board: &Board) {
    let started = Instant::now();
    let outcome = client
        .futures_tickers()
        .await
        .map(|opt| opt.map(|tickers| build_market_rows(&tickers)));
    publish_outcome("markets", &board.markets, outcome);
    Metrics::poll_duration("markets", started.elapsed().as_millis() as f64);
}

/// Refresh the builders view: name roster, then the volume sweep.
pub async fn refresh_builders(
    client: &OrderlyClient,
    board: &Board,
    roster: &[String],
    spacing: Duration,
) {
    let started = Instant::now();
    let outcome = match client.broker_names().await {
        Ok(Some(names)) => {
            let sweep = sweep_builder_volumes(client, roster, spacing).await;
            for item in &sweep {
                Metrics::sweep_item(item.outcome_label());
            }
            Ok(Some(build_builder_rows(&names, &sweep)))
        }
        Ok(None) => Ok(None),
        Err(e) => Err(e),
    };
    publish_outcome("builders", &board.builders, outcome);
    Metrics::poll_duration("builders", started.elapsed().as_millis() as f64);
}

/// Refresh the network stats view.
pub async fn refresh_stats(client: &OrderlyClient, board: &Board) {
    let started = Instant::now();
    let (volume, infos) = tokio::join!(client.aggregate_volume(), client.symbol_infos());
    let outcome = match (volume, infos) {
        (Ok(Some(aggregate)), Ok(Some(infos))) => {
            Ok(Some(build_network_stats(&aggregate, infos.len())))
        }
        (Err(e), _) | (_, Err(e)) => Err(e),
        _ => Ok(None),
    };
    publish_outcome("stats", &board.stats, outcome);
    Metrics::poll_duration("stats", started.elapsed().as_millis() as f64);
}

/// Refresh the funding rates view.
pub async fn refresh_funding(client: &OrderlyClient, board: &Board) {
    let started = Instant::now();
    let outcome = client.funding_rates().await;
    publish_outcome("funding", &board.funding, outcome);
    Metrics::poll_duration("funding", started.elapsed().as_millis() as f64);
}

/// Refresh the vaults view.
pub async fn refresh_vaults(client: &OrderlyClient, board: &Board) {
    let started = Instant::now();
    let outcome = client.vaults().await.map(|opt| opt.map(sort_vaults));
    publish_outcome("vaults", &board.vaults, outcome);
    Metrics::poll_duration("vaults", started.elapsed().as_millis() as f64);
}

fn publish_outcome<T: Clone>(
    view: &'static str,
    cell: &ViewCell<T>,
    outcome: Result<Option<T>, ClientError>,
) {
    match outcome {
        Ok(Some(value)) => {
            cell.publish(value);
            Metrics::poll_cycle(view, "ok");
            Metrics::view_updated(view, Utc::now().timestamp() as f64);
        }
        Ok(None) => {
            warn!(view, "Upstream returned no data, keeping previous snapshot");
            cell.fail("upstream returned no data".to_string());
            Metrics::poll_cycle(view, "no_data");
        }
        Err(e) => {
            warn!(view, error = %e, "View refresh failed, keeping previous snapshot");
            cell.fail(e.to_string());
            Metrics::poll_cycle(view, "error");
        }
    }
}
