//! Structured logging and Prometheus metrics for orderscope.
//!
//! - JSON logging in production, pretty output in development
//! - Counters and histograms for poll cycles, sweep items, and the
//!   dashboard's WebSocket population

pub mod error;
pub mod logging;
pub mod metrics;

pub use error::{TelemetryError, TelemetryResult};
pub use logging::init_logging;
pub use metrics::Metrics;
