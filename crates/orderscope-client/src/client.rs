//! Typed wrappers over the Orderly public endpoints.
//!
//! Every method is a GET through the retry loop followed by serde
//! extraction, preserving the three-way outcome: `Ok(Some(rows))`,
//! `Ok(None)` when the upstream reported failure, `Err` on transport or
//! decode problems. List endpoints wrap their payload in a `rows` array; a
//! missing `rows` key decodes as an empty list, matching upstream behavior
//! for quiet periods.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use orderscope_core::records::{
    AggregateVolumeStats, BrokerName, BrokerVolumeStats, FundingRate, FuturesTicker, SymbolInfo,
    VaultInfo,
};

use crate::error::{ClientError, ClientResult};
use crate::retry::{Fetcher, RetryPolicy};
use crate::transport::{DynTransport, HttpTransport};

/// Client for the Orderly public REST API.
///
/// Two base URLs: the main API serves tickers, brokers, and volume; the
/// strategy-vault API lives on a separate host.
pub struct OrderlyClient {
    fetcher: Fetcher,
    api_base: String,
    vaults_base: String,
    policy: RetryPolicy,
}

impl OrderlyClient {
    /// Create a client backed by a real HTTP transport.
    pub fn new(
        api_base: impl Into<String>,
        vaults_base: impl Into<String>,
        policy: RetryPolicy,
        timeout: Duration,
    ) -> ClientResult<Self> {
        let transport = HttpTransport::with_timeout(timeout)
            .map_err(|e| ClientError::Http(e.to_string()))?;
        Ok(Self::with_transport(
            std::sync::Arc::new(transport),
            api_base,
            vaults_base,
            policy,
        ))
    }

    /// Create a client over an injected transport (tests, instrumentation).
    pub fn with_transport(
        transport: DynTransport,
        api_base: impl Into<String>,
        vaults_base: impl Into<String>,
        policy: RetryPolicy,
    ) -> Self {
        Self {
            fetcher: Fetcher::new(transport),
            api_base: api_base.into(),
            vaults_base: vaults_base.into(),
            policy,
        }
    }

    /// All futures tickers.
    pub async fn futures_tickers(&self) -> ClientResult<Option<Vec<FuturesTicker>>> {
        let url = format!("{}/v1/public/futures", self.api_base);
        self.get_rows(&url).await
    }

    /// Instrument metadata for all listed symbols.
    pub async fn symbol_infos(&self) -> ClientResult<Option<Vec<SymbolInfo>>> {
        let url = format!("{}/v1/public/info", self.api_base);
        self.get_rows(&url).await
    }

    /// Registered broker ids and display names.
    pub async fn broker_names(&self) -> ClientResult<Option<Vec<BrokerName>>> {
        let url = format!("{}/v1/public/broker/name", self.api_base);
        self.get_rows(&url).await
    }

    /// Volume statistics for a single broker.
    pub async fn broker_volume(&self, broker_id: &str) -> ClientResult<Option<BrokerVolumeStats>> {
        let url = format!(
            "{}/v1/public/volume/stats?broker_id={broker_id}",
            self.api_base
        );
        self.get_object(&url).await
    }

    /// Network-wide volume statistics keyed by broker.
    pub async fn aggregate_volume(&self) -> ClientResult<Option<AggregateVolumeStats>> {
        let url = format!("{}/v1/public/volume/stats", self.api_base);
        self.get_object(&url).await
    }

    /// Current funding rates.
    pub async fn funding_rates(&self) -> ClientResult<Option<Vec<FundingRate>>> {
        let url = format!("{}/v1/public/funding_rates", self.api_base);
        self.get_rows(&url).await
    }

    /// Strategy vault performance records.
    pub async fn vaults(&self) -> ClientResult<Option<Vec<VaultInfo>>> {
        let url = format!(
            "{}/v1/public/strategy_vault/vault/info",
            self.vaults_base
        );
        self.get_rows(&url).await
    }

    async fn get_rows<T: DeserializeOwned>(&self, url: &str) -> ClientResult<Option<Vec<T>>> {
        match self.fetcher.fetch_with_retry(url, &self.policy).await? {
            Some(data) => {
                let rows = data.get("rows").cloned().unwrap_or(Value::Array(Vec::new()));
                Ok(Some(serde_json::from_value(rows)?))
            }
            None => {
                debug!(url, "Upstream returned no rows");
                Ok(None)
            }
        }
    }

    async fn get_object<T: DeserializeOwned>(&self, url: &str) -> ClientResult<Option<T>> {
        match self.fetcher.fetch_with_retry(url, &self.policy).await? {
            Some(data) => Ok(Some(serde_json::from_value(data)?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use serde_json::json;
    use std::sync::Arc;

    fn client_with(transport: Arc<MockTransport>) -> OrderlyClient {
        OrderlyClient::with_transport(
            transport,
            "http://api.test",
            "http://vaults.test",
            RetryPolicy::default(),
        )
    }

    #[tokio::test]
    async fn tickers_decode_from_rows() {
        let transport = Arc::new(MockTransport::new());
        transport.push_body(json!({
            "success": true,
            "data": {"rows": [
                {"symbol": "PERP_ETH_USDC", "mark_price": 3400.0, "24h_amount": 9.5e8}
            ]}
        }));
        let client = client_with(transport.clone());

        let tickers = client.futures_tickers().await.unwrap().unwrap();
        assert_eq!(tickers.len(), 1);
        assert_eq!(tickers[0].symbol, "PERP_ETH_USDC");
        assert_eq!(tickers[0].amount_24h, 9.5e8);
        assert_eq!(
            transport.requested_urls(),
            vec!["http://api.test/v1/public/futures"]
        );
    }

    #[tokio::test]
    async fn broker_volume_decodes_payload_object() {
        let transport = Arc::new(MockTransport::new());
        transport.push_body(json!({
            "success": true,
            "data": {
                "perp_volume_last_30_days": 2.5e8,
                "perp_volume_ltd": 3.1e9
            }
        }));
        let client = client_with(transport.clone());

        let stats = client.broker_volume("kodiak").await.unwrap().unwrap();
        assert_eq!(stats.perp_volume_last_30_days, 2.5e8);
        assert_eq!(
            transport.requested_urls(),
            vec!["http://api.test/v1/public/volume/stats?broker_id=kodiak"]
        );
    }

    #[tokio::test]
    async fn upstream_failure_surfaces_as_none() {
        let transport = Arc::new(MockTransport::new());
        transport.push_body(json!({"success": false, "code": -1101}));
        let client = client_with(transport);

        let names = client.broker_names().await.unwrap();
        assert!(names.is_none());
    }

    #[tokio::test]
    async fn missing_rows_key_is_an_empty_list() {
        let transport = Arc::new(MockTransport::new());
        transport.push_body(json!({"success": true, "data": {}}));
        let client = client_with(transport);

        let rates = client.funding_rates().await.unwrap().unwrap();
        assert!(rates.is_empty());
    }

    #[tokio::test]
    async fn malformed_payload_is_a_decode_error() {
        let transport = Arc::new(MockTransport::new());
        transport.push_body(json!({
            "success": true,
            "data": {"rows": [{"no_symbol_field": true}]}
        }));
        let client = client_with(transport);

        let result = client.futures_tickers().await;
        assert!(matches!(result, Err(ClientError::Decode(_))));
    }

    #[tokio::test]
    async fn vaults_use_the_vaults_base_url() {
        let transport = Arc::new(MockTransport::new());
        transport.push_body(json!({"success": true, "data": {"rows": []}}));
        let client = client_with(transport.clone());

        let vaults = client.vaults().await.unwrap().unwrap();
        assert!(vaults.is_empty());
        assert_eq!(
            transport.requested_urls(),
            vec!["http://vaults.test/v1/public/strategy_vault/vault/info"]
        );
    }
}
