//! Main application orchestration.
//!
//! Builds the client, the board, and the pollers, then runs the dashboard
//! server until a shutdown signal arrives. Poll loops are detached tasks;
//! they are aborted on shutdown since a half-finished refresh has nothing
//! to clean up.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::info;

use orderscope_client::OrderlyClient;
use orderscope_dashboard::run_server;
use orderscope_feed::{spawn_pollers, Board};

use crate::config::AppConfig;
use crate::error::{AppError, AppResult};

/// Main application.
pub struct Application {
    config: AppConfig,
}

impl Application {
    /// Create a new application.
    pub fn new(config: AppConfig) -> AppResult<Self> {
        if config.poll.builder_roster.is_empty() {
            tracing::warn!("Builder roster is empty; the builders view will stay empty");
        }
        Ok(Self { config })
    }

    /// Run until a shutdown signal.
    pub async fn run(self) -> AppResult<()> {
        let client = Arc::new(OrderlyClient::new(
            &self.config.api_base_url,
            &self.config.vaults_base_url,
            self.config.retry.to_policy(),
            self.config.request_timeout(),
        )?);

        let board = Arc::new(Board::new());

        info!(
            api_base = %self.config.api_base_url,
            roster_size = self.config.poll.builder_roster.len(),
            "Starting pollers"
        );
        let pollers = spawn_pollers(client, board.clone(), &self.config.poll);

        let result = if self.config.dashboard.enabled {
            tokio::select! {
                result = run_server(board, self.config.dashboard.clone()) => {
                    result.map_err(|e| AppError::Server(e.to_string()))
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                    Ok(())
                }
            }
        } else {
            info!("Dashboard disabled, polling only");
            tokio::signal::ctrl_c().await?;
            info!("Shutdown signal received");
            Ok(())
        };

        shutdown_pollers(pollers);
        result
    }
}

fn shutdown_pollers(pollers: Vec<JoinHandle<()>>) {
    for handle in &pollers {
        handle.abort();
    }
    info!(count = pollers.len(), "Pollers stopped");
}
