//! Dashboard API types.
//!
//! These types are used for JSON serialization in REST and WebSocket APIs.

use chrono::Utc;
use serde::Serialize;

use orderscope_core::records::{FundingRate, VaultInfo};
use orderscope_core::views::{BuilderRow, MarketRow, NetworkStats};
use orderscope_feed::{Board, ViewSnapshot};

/// REST response envelope, mirroring the upstream API's shape.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Unix milliseconds at response time.
    pub timestamp: i64,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}

/// One view inside the full snapshot document.
#[derive(Debug, Clone, Serialize)]
pub struct ViewDocument<T> {
    /// Last published rows; absent until the first successful refresh.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// When `data` was published (Unix milliseconds).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_updated_ms: Option<i64>,
    /// Error from the most recent refresh, if it failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_error: Option<String>,
}

impl<T> From<ViewSnapshot<T>> for ViewDocument<T> {
    fn from(snapshot: ViewSnapshot<T>) -> Self {
        Self {
            data: snapshot.data,
            last_updated_ms: snapshot.last_updated_ms,
            last_error: snapshot.last_error,
        }
    }
}

/// Full board snapshot (sent on WebSocket connect and via REST).
#[derive(Debug, Clone, Serialize)]
pub struct SnapshotDocument {
    pub timestamp_ms: i64,
    pub markets: ViewDocument<Vec<MarketRow>>,
    pub builders: ViewDocument<Vec<BuilderRow>>,
    pub stats: ViewDocument<NetworkStats>,
    pub funding: ViewDocument<Vec<FundingRate>>,
    pub vaults: ViewDocument<Vec<VaultInfo>>,
}

/// Copy the board's current state into a snapshot document.
pub fn collect_snapshot(board: &Board) -> SnapshotDocument {
    SnapshotDocument {
        timestamp_ms: Utc::now().timestamp_millis(),
        markets: board.markets.snapshot().into(),
        builders: board.builders.snapshot().into(),
        stats: board.stats.snapshot().into(),
        funding: board.funding.snapshot().into(),
        vaults: board.vaults.snapshot().into(),
    }
}

/// WebSocket message types (tagged enum for type safety).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DashboardMessage {
    /// Full snapshot (sent on connect and whenever the board changes).
    Snapshot(SnapshotDocument),
    /// A view's refresh started failing; its data is now stale.
    ViewStale {
        timestamp_ms: i64,
        view: String,
        error: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_document_serializes_view_state() {
        let board = Board::new();
        board.stats.publish(NetworkStats {
            total_volume: 2.5e9,
            builders: 12,
            markets: 97,
        });
        board.markets.fail("timeout".to_string());

        let json = serde_json::to_string(&collect_snapshot(&board)).unwrap();
        assert!(json.contains("\"total_volume\":2500000000.0"));
        assert!(json.contains("\"last_error\":\"timeout\""));
        // Views that never loaded serialize without a data key.
        assert!(!json.contains("\"vaults\":{\"data\""));
    }

    #[test]
    fn message_tagging() {
        let msg = DashboardMessage::ViewStale {
            timestamp_ms: 1706400000000,
            view: "markets".to_string(),
            error: "connection refused".to_string(),
        };

        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"view_stale\""));
        assert!(json.contains("\"view\":\"markets\""));
    }

    #[test]
    fn api_response_envelope_shape() {
        let ok = ApiResponse::ok(vec![1, 2, 3]);
        let json = serde_json::to_string(&ok).unwrap();
        assert!(json.contains("\"success\":true"));
        assert!(json.contains("\"data\":[1,2,3]"));
        assert!(!json.contains("\"error\""));

        let err: ApiResponse<Vec<u8>> = ApiResponse::error("not ready".to_string());
        let json = serde_json::to_string(&err).unwrap();
        assert!(json.contains("\"success\":false"));
        assert!(json.contains("\"error\":\"not ready\""));
        assert!(!json.contains("\"data\""));
    }
}
