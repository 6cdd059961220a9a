//! Client error types.

use thiserror::Error;

/// Transport-level failure: the request never produced a parseable JSON
/// body. These are never retried and always propagate to the caller.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("HTTP request failed: {0}")]
    Request(String),

    #[error("Response body is not valid JSON: {0}")]
    Body(String),
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Payload decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("HTTP client error: {0}")]
    Http(String),
}

pub type ClientResult<T> = Result<T, ClientError>;
