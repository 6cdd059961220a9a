//! Resilient HTTP client for the Orderly public API.
//!
//! The crate is layered:
//! - [`transport`] — the raw GET-a-JSON-body seam ([`Transport`]), with a
//!   reqwest-backed implementation and a scripted mock for tests
//! - [`envelope`] — the `{success, code, data}` envelope every upstream
//!   response carries
//! - [`retry`] — [`Fetcher::fetch_with_retry`], the bounded retry loop that
//!   distinguishes rate limiting from every other failure
//! - [`client`] — [`OrderlyClient`], typed wrappers over the public
//!   endpoints
//!
//! The retry loop's outcome is deliberately three-way: `Ok(Some(data))` on
//! success, `Ok(None)` when the upstream said no (callers skip the item),
//! and `Err` only for transport-level failure (callers treat the item's
//! iteration as failed).

pub mod client;
pub mod envelope;
pub mod error;
pub mod retry;
pub mod transport;

pub use client::OrderlyClient;
pub use envelope::Envelope;
pub use error::{ClientError, ClientResult, TransportError};
pub use retry::{Fetcher, RetryPolicy};
pub use transport::{BoxFuture, HttpTransport, MockTransport, Transport};
