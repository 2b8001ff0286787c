use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Client, Method};
use tracing::debug;
use url::Url;

use super::ports::{Transport, TransportError, TransportResult};
use super::{RequestScope, join_url};

const USER_AGENT_VALUE: &str = concat!("ncanode-client/", env!("CARGO_PKG_VERSION"));

/// `reqwest` backed transport bound to a single service base URL.
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport with a default client.
    pub fn new(base_url: impl Into<String>) -> TransportResult<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT_VALUE)
            .build()
            .map_err(|e| TransportError::Client(e.to_string()))?;

        Ok(Self::with_client(base_url, client))
    }

    /// Creates a transport around a preconfigured client (proxies, custom
    /// roots, pooling limits).
    pub fn with_client(base_url: impl Into<String>, client: Client) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn resolve(&self, path: &str) -> TransportResult<Url> {
        let url = join_url(&self.base_url, path);
        Url::parse(&url).map_err(|e| TransportError::InvalidUrl {
            url,
            reason: e.to_string(),
        })
    }

    async fn exchange(&self, method: Method, url: Url, body: Vec<u8>) -> TransportResult<Vec<u8>> {
        let response = self
            .client
            .request(method, url)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .body(body)
            .send()
            .await
            .map_err(|e| TransportError::Connect(e.to_string()))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Read(e.to_string()))?;

        debug!(%status, len = bytes.len(), "received response");
        Ok(bytes.to_vec())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(
        &self,
        scope: &RequestScope,
        method: Method,
        path: &str,
        body: Vec<u8>,
    ) -> TransportResult<Vec<u8>> {
        if scope.is_cancelled() {
            return Err(TransportError::Cancelled);
        }

        let url = self.resolve(path)?;
        debug!(%method, %url, "sending request");

        tokio::select! {
            biased;
            _ = scope.cancelled() => Err(TransportError::Cancelled),
            outcome = tokio::time::timeout_at(scope.deadline(), self.exchange(method, url, body)) => {
                outcome.map_err(|_| TransportError::Timeout(scope.timeout()))?
            }
        }
    }
}
