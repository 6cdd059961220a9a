//! Prometheus metrics for the aggregation service.
//!
//! # Panics
//!
//! Metric registration uses `unwrap()` intentionally. A registration
//! failure means duplicate metric names, a fatal configuration error that
//! should crash at startup rather than fail silently. These panics only
//! occur during static initialization, never at runtime.

use once_cell::sync::Lazy;
use prometheus::{
    register_counter_vec, register_gauge_vec, register_histogram_vec, register_int_gauge,
    CounterVec, GaugeVec, HistogramVec, IntGauge,
};

/// Poll cycles by view and outcome (ok / no_data / error).
pub static POLL_CYCLES_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "orderscope_poll_cycles_total",
        "Total poll cycles by view and outcome",
        &["view", "outcome"]
    )
    .unwrap()
});

/// Poll cycle duration in milliseconds.
pub static POLL_DURATION_MS: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "orderscope_poll_duration_ms",
        "Poll cycle duration in milliseconds",
        &["view"],
        vec![10.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0, 30000.0]
    )
    .unwrap()
});

/// Builder sweep items by outcome (ok / skipped / failed).
pub static SWEEP_ITEMS_TOTAL: Lazy<CounterVec> = Lazy::new(|| {
    register_counter_vec!(
        "orderscope_sweep_items_total",
        "Total builder sweep items by outcome",
        &["outcome"]
    )
    .unwrap()
});

/// Unix timestamp of the last successful refresh per view.
pub static VIEW_LAST_UPDATE: Lazy<GaugeVec> = Lazy::new(|| {
    register_gauge_vec!(
        "orderscope_view_last_update_seconds",
        "Unix timestamp of the last successful refresh per view",
        &["view"]
    )
    .unwrap()
});

/// Currently connected WebSocket clients.
pub static WS_CLIENTS: Lazy<IntGauge> = Lazy::new(|| {
    register_int_gauge!(
        "orderscope_ws_clients",
        "Currently connected WebSocket clients"
    )
    .unwrap()
});

/// Metrics facade for easy access.
pub struct Metrics;

impl Metrics {
    /// Record a completed poll cycle.
    pub fn poll_cycle(view: &str, outcome: &str) {
        POLL_CYCLES_TOTAL.with_label_values(&[view, outcome]).inc();
    }

    /// Record a poll cycle's duration.
    pub fn poll_duration(view: &str, duration_ms: f64) {
        POLL_DURATION_MS
            .with_label_values(&[view])
            .observe(duration_ms);
    }

    /// Record a builder sweep item outcome.
    pub fn sweep_item(outcome: &str) {
        SWEEP_ITEMS_TOTAL.with_label_values(&[outcome]).inc();
    }

    /// Record a successful view refresh.
    pub fn view_updated(view: &str, unix_seconds: f64) {
        VIEW_LAST_UPDATE.with_label_values(&[view]).set(unix_seconds);
    }

    /// WebSocket client connected.
    pub fn ws_client_connected() {
        WS_CLIENTS.inc();
    }

    /// WebSocket client disconnected.
    pub fn ws_client_disconnected() {
        WS_CLIENTS.dec();
    }
}
