//! HTTP plumbing shared by the NCANode backends.
//!
//! A [`Transport`] performs exactly one request against the configured
//! service and hands back the raw response body. Backends never see
//! `reqwest` types besides [`reqwest::Method`].

mod http;
mod ports;

#[cfg(test)]
pub(crate) mod fake;

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::{CancellationToken, DropGuard};

pub use http::HttpTransport;
pub use ports::{Transport, TransportError, TransportResult};

/// Joins the service base URL with a request path.
///
/// Every trailing `/` of `base` and every leading `/` of `path` is dropped
/// before joining with a single separator. An empty path yields the bare base.
pub fn join_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');

    if path.is_empty() {
        return base.to_string();
    }

    format!("{base}/{path}")
}

/// Deadline-bound scope for a single outbound request.
///
/// The scope owns a child of the caller's cancellation token. Dropping the
/// scope cancels that child, so nothing started under it outlives the call.
#[derive(Debug)]
pub struct RequestScope {
    token: CancellationToken,
    deadline: Instant,
    timeout: Duration,
    _guard: DropGuard,
}

impl RequestScope {
    pub fn new(parent: &CancellationToken, timeout: Duration) -> Self {
        let token = parent.child_token();
        Self {
            _guard: token.clone().drop_guard(),
            token,
            deadline: Instant::now() + timeout,
            timeout,
        }
    }

    pub fn deadline(&self) -> Instant {
        self.deadline
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Resolves once the caller cancels the enclosing scope.
    pub async fn cancelled(&self) {
        self.token.cancelled().await
    }
}
