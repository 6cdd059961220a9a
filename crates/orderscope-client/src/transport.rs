//! Transport seam for upstream GET requests.
//!
//! [`Transport`] abstracts "GET this URL and give me the parsed JSON body"
//! so the retry loop and the typed client can be exercised against scripted
//! responses. The real implementation wraps reqwest with a per-attempt
//! timeout.

use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::error::TransportError;

/// Boxed future for dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn std::future::Future<Output = T> + Send + 'a>>;

/// Default per-attempt timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Trait for fetching a JSON body from a URL.
///
/// A timeout, connection failure, or non-JSON body is a [`TransportError`].
/// HTTP status is deliberately ignored: the upstream signals failure inside
/// the JSON envelope, and rate-limited responses carry a parseable body
/// regardless of status.
pub trait Transport: Send + Sync {
    /// Perform one GET and parse the body as JSON.
    fn get_json(&self, url: &str) -> BoxFuture<'_, Result<Value, TransportError>>;
}

/// Arc wrapper for Transport trait objects.
pub type DynTransport = Arc<dyn Transport>;

/// reqwest-backed transport.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Create a transport with the default per-attempt timeout.
    pub fn new() -> Result<Self, TransportError> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a transport with an explicit per-attempt timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::Request(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get_json(&self, url: &str) -> BoxFuture<'_, Result<Value, TransportError>> {
        let request = self.client.get(url);
        Box::pin(async move {
            let response = request
                .send()
                .await
                .map_err(|e| TransportError::Request(format!("HTTP request failed: {e}")))?;

            let body = response
                .text()
                .await
                .map_err(|e| TransportError::Request(format!("Failed to read body: {e}")))?;

            serde_json::from_str(&body).map_err(|e| TransportError::Body(e.to_string()))
        })
    }
}

/// Scripted transport for tests.
///
/// Responses are consumed front-to-back; requesting past the end of the
/// script returns a transport error. Requested URLs are recorded for
/// verification.
pub struct MockTransport {
    responses: parking_lot::Mutex<VecDeque<Result<Value, TransportError>>>,
    requests: parking_lot::Mutex<Vec<String>>,
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransport {
    /// Create a mock with an empty script.
    pub fn new() -> Self {
        Self {
            responses: parking_lot::Mutex::new(VecDeque::new()),
            requests: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful JSON body.
    pub fn push_body(&self, body: Value) {
        self.responses.lock().push_back(Ok(body));
    }

    /// Queue a transport failure.
    pub fn push_error(&self, error: TransportError) {
        self.responses.lock().push_back(Err(error));
    }

    /// Number of requests made so far.
    pub fn request_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// URLs requested, in order.
    pub fn requested_urls(&self) -> Vec<String> {
        self.requests.lock().clone()
    }
}

impl Transport for MockTransport {
    fn get_json(&self, url: &str) -> BoxFuture<'_, Result<Value, TransportError>> {
        self.requests.lock().push(url.to_string());
        let next = self.responses.lock().pop_front();
        Box::pin(async move {
            next.unwrap_or_else(|| {
                Err(TransportError::Request(
                    "MockTransport script exhausted".to_string(),
                ))
            })
        })
    }
}
