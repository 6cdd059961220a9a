//! Bounded, cause-discriminating retry around a single upstream GET.
//!
//! The upstream signals "back off and try again" with an application-level
//! code inside a successfully delivered envelope. That is the ONLY condition
//! that triggers a retry. Everything else resolves on the first attempt:
//! a successful envelope returns its payload, any other application failure
//! returns "no result", and a transport failure propagates as an error
//! immediately, whether or not attempts remain.
//!
//! The resulting asymmetry is load-bearing for callers: "no result" means
//! "skip this item and keep going", while a transport error means "this
//! item's fetch failed". Collapsing the two would change batch behavior.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::envelope::Envelope;
use crate::error::TransportError;
use crate::transport::DynTransport;

/// Application-level code the upstream uses for rate limiting.
pub const RATE_LIMIT_CODE: i64 = -1003;

/// Retry configuration for one call site. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; total attempts = max_retries + 1.
    pub max_retries: u32,
    /// Fixed wait before a rate-limit retry. Not exponential, and must stay
    /// that way: callers and tests depend on the observable timing.
    pub backoff_delay: Duration,
    /// Envelope code that makes a retry safe.
    pub rate_limit_code: i64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff_delay: Duration::from_millis(1000),
            rate_limit_code: RATE_LIMIT_CODE,
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    pub fn no_retries() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }
}

/// Executes GETs through a [`Transport`](crate::transport::Transport) with
/// the retry contract above.
///
/// A single call is strictly sequential: attempt N+1 never starts before
/// attempt N's outcome is known. Independent calls share no mutable state
/// and may run concurrently.
#[derive(Clone)]
pub struct Fetcher {
    transport: DynTransport,
}

impl Fetcher {
    pub fn new(transport: DynTransport) -> Self {
        Self { transport }
    }

    /// Fetch `url`, retrying on the rate-limit code up to
    /// `policy.max_retries` times.
    ///
    /// Returns `Ok(Some(data))` on a successful envelope, `Ok(None)` when
    /// the upstream reported failure (including rate-limit exhaustion), and
    /// `Err` on transport failure at any attempt.
    pub async fn fetch_with_retry(
        &self,
        url: &str,
        policy: &RetryPolicy,
    ) -> Result<Option<Value>, TransportError> {
        let mut attempt: u32 = 0;
        loop {
            let body = self.transport.get_json(url).await?;
            let envelope = Envelope::from_value(body);

            if envelope.success {
                return Ok(envelope.data);
            }

            if envelope.code == Some(policy.rate_limit_code) && attempt < policy.max_retries {
                attempt += 1;
                debug!(
                    url,
                    attempt,
                    max_retries = policy.max_retries,
                    "Rate limited, backing off before retry"
                );
                tokio::time::sleep(policy.backoff_delay).await;
                continue;
            }

            if envelope.code == Some(policy.rate_limit_code) {
                debug!(url, attempts = attempt + 1, "Rate limit retries exhausted");
            } else {
                debug!(url, code = ?envelope.code, "Upstream reported failure");
            }
            return Ok(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::MockTransport;
    use serde_json::json;
    use std::sync::Arc;
    use tokio::time::Instant;

    fn rate_limited() -> Value {
        json!({"success": false, "code": -1003})
    }

    fn ok_payload(value: Value) -> Value {
        json!({"success": true, "data": value})
    }

    fn fetcher_with(script: &[Value]) -> (Fetcher, Arc<MockTransport>) {
        let transport = Arc::new(MockTransport::new());
        for body in script {
            transport.push_body(body.clone());
        }
        (Fetcher::new(transport.clone()), transport)
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_makes_exactly_max_plus_one_calls_and_no_result() {
        let policy = RetryPolicy::default();
        let (fetcher, transport) =
            fetcher_with(&[rate_limited(), rate_limited(), rate_limited()]);

        let outcome = fetcher.fetch_with_retry("http://x/stats", &policy).await;

        assert!(matches!(outcome, Ok(None)));
        assert_eq!(transport.request_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn immediate_success_makes_one_call() {
        let policy = RetryPolicy {
            max_retries: 5,
            ..RetryPolicy::default()
        };
        let (fetcher, transport) = fetcher_with(&[ok_payload(json!({"x": 1}))]);

        let start = Instant::now();
        let outcome = fetcher
            .fetch_with_retry("http://x/stats", &policy)
            .await
            .unwrap();

        assert_eq!(outcome, Some(json!({"x": 1})));
        assert_eq!(transport.request_count(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn non_rate_limit_code_fails_fast_without_retry() {
        let policy = RetryPolicy::default();
        let (fetcher, transport) =
            fetcher_with(&[json!({"success": false, "code": -1101})]);

        let outcome = fetcher.fetch_with_retry("http://x/stats", &policy).await;

        assert!(matches!(outcome, Ok(None)));
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn each_retry_waits_exactly_the_backoff_delay() {
        // maxRetries=2, backoff=1000ms, responses: rate-limit, rate-limit,
        // success. Expect 3 calls, 2000ms of waiting, final payload {x: 1}.
        let policy = RetryPolicy::default();
        let (fetcher, transport) = fetcher_with(&[
            rate_limited(),
            rate_limited(),
            ok_payload(json!({"x": 1})),
        ]);

        let start = Instant::now();
        let outcome = fetcher
            .fetch_with_retry("http://x/stats", &policy)
            .await
            .unwrap();

        assert_eq!(outcome, Some(json!({"x": 1})));
        assert_eq!(transport.request_count(), 3);
        assert_eq!(start.elapsed(), Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn exhaustion_waits_between_attempts_but_not_after_the_last() {
        let policy = RetryPolicy::default();
        let (fetcher, transport) =
            fetcher_with(&[rate_limited(), rate_limited(), rate_limited()]);

        let start = Instant::now();
        let outcome = fetcher
            .fetch_with_retry("http://x/stats", &policy)
            .await
            .unwrap();

        assert_eq!(outcome, None);
        assert_eq!(transport.request_count(), 3);
        // Two waits: before attempt 2 and before attempt 3.
        assert_eq!(start.elapsed(), Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn transport_error_propagates_immediately_on_first_attempt() {
        // Attempts remained, but transport failures are not the rate-limit
        // branch: they propagate at once rather than burning retries.
        let policy = RetryPolicy::default();
        let transport = Arc::new(MockTransport::new());
        transport.push_error(TransportError::Request("connection refused".to_string()));
        transport.push_body(ok_payload(json!({"x": 1})));
        let fetcher = Fetcher::new(transport.clone());

        let start = Instant::now();
        let outcome = fetcher.fetch_with_retry("http://x/stats", &policy).await;

        assert!(matches!(outcome, Err(TransportError::Request(_))));
        assert_eq!(transport.request_count(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn transport_error_after_rate_limit_retry_still_propagates() {
        let policy = RetryPolicy::default();
        let transport = Arc::new(MockTransport::new());
        transport.push_body(rate_limited());
        transport.push_error(TransportError::Body("not json".to_string()));
        let fetcher = Fetcher::new(transport.clone());

        let outcome = fetcher.fetch_with_retry("http://x/stats", &policy).await;

        assert!(matches!(outcome, Err(TransportError::Body(_))));
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_retries_means_one_attempt_and_no_sleep() {
        let policy = RetryPolicy::no_retries();
        let (fetcher, transport) = fetcher_with(&[rate_limited()]);

        let start = Instant::now();
        let outcome = fetcher
            .fetch_with_retry("http://x/stats", &policy)
            .await
            .unwrap();

        assert_eq!(outcome, None);
        assert_eq!(transport.request_count(), 1);
        assert_eq!(start.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_envelope_is_no_result_after_one_call() {
        let policy = RetryPolicy::default();
        let (fetcher, transport) = fetcher_with(&[json!({"rows": [1, 2]})]);

        let outcome = fetcher
            .fetch_with_retry("http://x/stats", &policy)
            .await
            .unwrap();

        assert_eq!(outcome, None);
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_code_on_failure_does_not_retry() {
        let policy = RetryPolicy::default();
        let (fetcher, transport) = fetcher_with(&[json!({"success": false})]);

        let outcome = fetcher
            .fetch_with_retry("http://x/stats", &policy)
            .await
            .unwrap();

        assert_eq!(outcome, None);
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn success_short_circuits_remaining_retries() {
        let policy = RetryPolicy {
            max_retries: 4,
            ..RetryPolicy::default()
        };
        let (fetcher, transport) = fetcher_with(&[
            rate_limited(),
            ok_payload(json!([1, 2, 3])),
            rate_limited(),
        ]);

        let outcome = fetcher
            .fetch_with_retry("http://x/stats", &policy)
            .await
            .unwrap();

        assert_eq!(outcome, Some(json!([1, 2, 3])));
        assert_eq!(transport.request_count(), 2);
    }
}
