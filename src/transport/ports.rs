//! Contract between the signing backends and the HTTP layer.

use async_trait::async_trait;
use reqwest::Method;

use super::RequestScope;

pub type TransportResult<T> = Result<T, TransportError>;

/// Errors raised while talking to the remote service.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid request url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to create HTTP client: {0}")]
    Client(String),

    #[error("http request failed: {0}")]
    Connect(String),

    #[error("failed to read response body: {0}")]
    Read(String),

    #[error("request timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("request cancelled")]
    Cancelled,
}

/// Performs one HTTP exchange with the service.
///
/// Implementations must be safe to share across concurrent calls.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `body` to `path` (relative to the service base URL) and returns
    /// the response body bytes.
    ///
    /// # Errors
    /// * `Cancelled` if `scope` is cancelled before or during the exchange
    /// * `Timeout` if the scope deadline passes first
    /// * `InvalidUrl`, `Connect` or `Read` for request construction, network
    ///   and body read failures respectively
    async fn request(
        &self,
        scope: &RequestScope,
        method: Method,
        path: &str,
        body: Vec<u8>,
    ) -> TransportResult<Vec<u8>>;
}
