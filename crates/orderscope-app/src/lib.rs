//! orderscope - Orderly network analytics service.
//!
//! Wires the components together:
//! - Resilient HTTP client against the Orderly public API
//! - View pollers publishing into the shared board
//! - Dashboard server exposing the board over REST and WebSocket

pub mod app;
pub mod config;
pub mod error;

pub use app::Application;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
