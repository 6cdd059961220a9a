//! End-to-end retry behavior through the typed client layer.
//!
//! The unit tests in `retry.rs` pin the loop in isolation; these verify the
//! contract survives the typed wrappers unchanged.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::time::Instant;

use orderscope_client::{ClientError, MockTransport, OrderlyClient, RetryPolicy, TransportError};

fn client(transport: Arc<MockTransport>, policy: RetryPolicy) -> OrderlyClient {
    OrderlyClient::with_transport(transport, "http://api.test", "http://vaults.test", policy)
}

#[tokio::test(start_paused = true)]
async fn rate_limited_twice_then_rows_arrive() {
    let transport = Arc::new(MockTransport::new());
    transport.push_body(json!({"success": false, "code": -1003}));
    transport.push_body(json!({"success": false, "code": -1003}));
    transport.push_body(json!({
        "success": true,
        "data": {"rows": [{"broker_id": "kodiak", "broker_name": "Kodiak"}]}
    }));

    let client = client(transport.clone(), RetryPolicy::default());

    let start = Instant::now();
    let names = client.broker_names().await.unwrap().unwrap();

    assert_eq!(names.len(), 1);
    assert_eq!(names[0].broker_name, "Kodiak");
    assert_eq!(transport.request_count(), 3);
    assert_eq!(start.elapsed(), Duration::from_millis(2000));
    // All three attempts hit the same URL.
    assert!(transport
        .requested_urls()
        .iter()
        .all(|u| u == "http://api.test/v1/public/broker/name"));
}

#[tokio::test(start_paused = true)]
async fn exhausted_rate_limit_is_a_quiet_miss_not_an_error() {
    let transport = Arc::new(MockTransport::new());
    for _ in 0..3 {
        transport.push_body(json!({"success": false, "code": -1003}));
    }

    let client = client(transport.clone(), RetryPolicy::default());

    let outcome = client.broker_volume("aden").await.unwrap();
    assert!(outcome.is_none());
    assert_eq!(transport.request_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn transport_failure_is_loud() {
    let transport = Arc::new(MockTransport::new());
    transport.push_error(TransportError::Request("connection refused".into()));

    let client = client(transport.clone(), RetryPolicy::default());

    let outcome = client.broker_volume("aden").await;
    assert!(matches!(outcome, Err(ClientError::Transport(_))));
    assert_eq!(transport.request_count(), 1);
}
