//! HTTP server implementation using axum.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::get;
use axum::Router;
use futures_util::stream::StreamExt;
use futures_util::SinkExt;
use prometheus::TextEncoder;
use serde::Serialize;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tracing::{debug, info, warn};

use orderscope_feed::{Board, ViewSnapshot};
use orderscope_telemetry::Metrics;

use crate::config::DashboardConfig;
use crate::types::{collect_snapshot, ApiResponse, DashboardMessage};

/// Connection limiter to prevent too many concurrent WebSocket connections.
pub struct ConnectionLimiter {
    current: AtomicUsize,
    max: usize,
}

impl ConnectionLimiter {
    pub fn new(max: usize) -> Self {
        Self {
            current: AtomicUsize::new(0),
            max,
        }
    }

    pub fn try_acquire(&self) -> Option<ConnectionGuard<'_>> {
        loop {
            let current = self.current.load(Ordering::Acquire);
            if current >= self.max {
                return None;
            }
            if self
                .current
                .compare_exchange(current, current + 1, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return Some(ConnectionGuard { limiter: self });
            }
        }
    }

    pub fn current_count(&self) -> usize {
        self.current.load(Ordering::Relaxed)
    }
}

pub struct ConnectionGuard<'a> {
    limiter: &'a ConnectionLimiter,
}

impl Drop for ConnectionGuard<'_> {
    fn drop(&mut self) {
        self.limiter.current.fetch_sub(1, Ordering::Release);
    }
}

/// Shared application state for axum handlers.
#[derive(Clone)]
pub struct AppState {
    board: Arc<Board>,
    broadcast_tx: broadcast::Sender<String>,
    connection_limiter: Arc<ConnectionLimiter>,
    config: DashboardConfig,
}

impl AppState {
    pub fn new(
        board: Arc<Board>,
        broadcast_tx: broadcast::Sender<String>,
        config: DashboardConfig,
    ) -> Self {
        Self {
            board,
            broadcast_tx,
            connection_limiter: Arc::new(ConnectionLimiter::new(config.max_connections)),
            config,
        }
    }
}

/// Create the axum router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/api/markets", get(get_markets))
        .route("/api/builders", get(get_builders))
        .route("/api/stats", get(get_stats))
        .route("/api/funding", get(get_funding))
        .route("/api/vaults", get(get_vaults))
        .route("/api/snapshot", get(get_snapshot))
        .route("/metrics", get(get_metrics))
        .route("/ws", get(ws_handler))
        // Read-only public data; let any origin consume it.
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the index HTML page.
async fn serve_index() -> Html<&'static str> {
    Html(include_str!("../static/index.html"))
}

async fn get_markets(State(state): State<AppState>) -> Response {
    view_response(state.board.markets.snapshot())
}

async fn get_builders(State(state): State<AppState>) -> Response {
    view_response(state.board.builders.snapshot())
}

async fn get_stats(State(state): State<AppState>) -> Response {
    view_response(state.board.stats.snapshot())
}

async fn get_funding(State(state): State<AppState>) -> Response {
    view_response(state.board.funding.snapshot())
}

async fn get_vaults(State(state): State<AppState>) -> Response {
    view_response(state.board.vaults.snapshot())
}

/// Get the full board snapshot as JSON.
async fn get_snapshot(State(state): State<AppState>) -> Response {
    Json(collect_snapshot(&state.board)).into_response()
}

/// Render a single view with the `{success, data, timestamp}` envelope.
///
/// Stale data still serves as success; 503 only while the view has never
/// loaded.
fn view_response<T: Serialize>(snapshot: ViewSnapshot<T>) -> Response {
    match snapshot.data {
        Some(data) => (StatusCode::OK, Json(ApiResponse::ok(data))).into_response(),
        None => {
            let message = snapshot
                .last_error
                .unwrap_or_else(|| "view not yet loaded".to_string());
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse::<T>::error(message)),
            )
                .into_response()
        }
    }
}

/// Prometheus exposition endpoint.
async fn get_metrics() -> Response {
    let encoder = TextEncoder::new();
    match encoder.encode_to_string(&prometheus::gather()) {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}

/// WebSocket upgrade handler.
async fn ws_handler(State(state): State<AppState>, ws: WebSocketUpgrade) -> Response {
    if state.connection_limiter.current_count() >= state.config.max_connections {
        warn!(
            current = state.connection_limiter.current_count(),
            max = state.config.max_connections,
            "WebSocket connection limit reached"
        );
        return (StatusCode::SERVICE_UNAVAILABLE, "Too many connections").into_response();
    }

    ws.on_upgrade(move |socket| handle_ws_connection(socket, state))
}

/// Handle a WebSocket connection.
async fn handle_ws_connection(socket: WebSocket, state: AppState) {
    // The pre-upgrade check is advisory; the guard here is authoritative.
    let _guard = match state.connection_limiter.try_acquire() {
        Some(guard) => guard,
        None => {
            warn!("Connection limit reached during upgrade");
            return;
        }
    };

    Metrics::ws_client_connected();
    info!(
        connections = state.connection_limiter.current_count(),
        "New WebSocket connection"
    );

    let (mut sender, mut receiver) = socket.split();

    // Subscribe before sending the initial snapshot so no update is lost
    // in between.
    let mut broadcast_rx = state.broadcast_tx.subscribe();

    let initial = DashboardMessage::Snapshot(collect_snapshot(&state.board));
    if let Ok(json) = serde_json::to_string(&initial) {
        if sender.send(Message::Text(json.into())).await.is_err() {
            debug!("Failed to send initial snapshot, client disconnected");
            Metrics::ws_client_disconnected();
            return;
        }
    }

    // Drain incoming frames for close handling; pongs are automatic.
    let mut incoming_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Close(_)) => {
                    debug!("Client sent close frame");
                    break;
                }
                Err(e) => {
                    debug!(error = %e, "WebSocket receive error");
                    break;
                }
                _ => {}
            }
        }
    });

    // Main loop: forward broadcast messages to the socket.
    loop {
        tokio::select! {
            result = broadcast_rx.recv() => {
                match result {
                    Ok(msg) => {
                        if sender.send(Message::Text(msg.into())).await.is_err() {
                            debug!("Failed to send message, client disconnected");
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!(skipped = n, "WebSocket client lagged, catching up");
                    }
                    Err(broadcast::error::RecvError::Closed) => {
                        debug!("Broadcast channel closed");
                        break;
                    }
                }
            }
            _ = &mut incoming_task => {
                debug!("Incoming task completed, closing connection");
                break;
            }
        }
    }

    Metrics::ws_client_disconnected();
    info!(
        connections = state.connection_limiter.current_count().saturating_sub(1),
        "WebSocket connection closed"
    );
}

/// Run the dashboard HTTP server.
pub async fn run_server(
    board: Arc<Board>,
    config: DashboardConfig,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Buffer a handful of snapshots for slow clients; laggards skip to
    // the newest.
    let (broadcast_tx, _) = broadcast::channel::<String>(32);

    let state = AppState::new(board.clone(), broadcast_tx.clone(), config.clone());
    let app = create_router(state);

    let update_interval_ms = config.update_interval_ms;
    tokio::spawn(async move {
        crate::broadcast::run_broadcaster(board, broadcast_tx, update_interval_ms).await;
    });

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(port = config.port, "Starting dashboard server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
