//! Shared snapshot store for the polled views.
//!
//! One [`ViewCell`] per view. Publishing replaces the cell's value and
//! clears its error; a failed refresh records the error but keeps the last
//! good value so the dashboard serves stale-but-present data. Every state
//! change bumps a board-wide version counter the broadcaster uses for
//! change detection.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::RwLock;

use orderscope_core::records::{FundingRate, VaultInfo};
use orderscope_core::views::{BuilderRow, MarketRow, NetworkStats};

/// Read-only copy of a view's current state.
#[derive(Debug, Clone)]
pub struct ViewSnapshot<T> {
    /// Last published value; `None` until the first successful refresh.
    pub data: Option<T>,
    /// When `data` was last published (Unix milliseconds).
    pub last_updated_ms: Option<i64>,
    /// Error from the most recent refresh, if it failed.
    pub last_error: Option<String>,
}

struct ViewState<T> {
    data: Option<T>,
    last_updated_ms: Option<i64>,
    last_error: Option<String>,
}

/// One view's slot on the board.
pub struct ViewCell<T> {
    state: RwLock<ViewState<T>>,
    version: Arc<AtomicU64>,
}

impl<T: Clone> ViewCell<T> {
    fn new(version: Arc<AtomicU64>) -> Self {
        Self {
            state: RwLock::new(ViewState {
                data: None,
                last_updated_ms: None,
                last_error: None,
            }),
            version,
        }
    }

    /// Publish a fresh value, clearing any recorded error.
    pub fn publish(&self, value: T) {
        let mut state = self.state.write();
        state.data = Some(value);
        state.last_updated_ms = Some(Utc::now().timestamp_millis());
        state.last_error = None;
        drop(state);
        self.version.fetch_add(1, Ordering::Release);
    }

    /// Record a failed refresh. The previous value is retained.
    pub fn fail(&self, error: String) {
        let mut state = self.state.write();
        state.last_error = Some(error);
        drop(state);
        self.version.fetch_add(1, Ordering::Release);
    }

    /// Copy out the current state.
    pub fn snapshot(&self) -> ViewSnapshot<T> {
        let state = self.state.read();
        ViewSnapshot {
            data: state.data.clone(),
            last_updated_ms: state.last_updated_ms,
            last_error: state.last_error.clone(),
        }
    }

    /// Whether the view has ever published.
    pub fn has_data(&self) -> bool {
        self.state.read().data.is_some()
    }
}

/// The board: one cell per dashboard view.
pub struct Board {
    version: Arc<AtomicU64>,
    pub markets: ViewCell<Vec<MarketRow>>,
    pub builders: ViewCell<Vec<BuilderRow>>,
    pub stats: ViewCell<NetworkStats>,
    pub funding: ViewCell<Vec<FundingRate>>,
    pub vaults: ViewCell<Vec<VaultInfo>>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    pub fn new() -> Self {
        let version = Arc::new(AtomicU64::new(0));
        Self {
            markets: ViewCell::new(version.clone()),
            builders: ViewCell::new(version.clone()),
            stats: ViewCell::new(version.clone()),
            funding: ViewCell::new(version.clone()),
            vaults: ViewCell::new(version.clone()),
            version,
        }
    }

    /// Monotonic counter bumped by every publish or failure.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }
}
