use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Method;

use super::ports::{Transport, TransportError, TransportResult};
use super::RequestScope;

/// Request as seen by [`FakeTransport`].
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub body: Vec<u8>,
}

impl RecordedRequest {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_slice(&self.body).expect("recorded body is json")
    }
}

/// Canned transport for backend tests: returns a fixed body or a fixed error
/// and records every request it receives.
pub(crate) struct FakeTransport {
    response: Result<Vec<u8>, fn() -> TransportError>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl FakeTransport {
    pub fn responding(body: &str) -> Self {
        Self {
            response: Ok(body.as_bytes().to_vec()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(make_error: fn() -> TransportError) -> Self {
        Self {
            response: Err(make_error),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("lock poisoned").clone()
    }
}

#[async_trait]
impl Transport for FakeTransport {
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

        self.requests
            .lock()
            .expect("lock poisoned")
            .push(RecordedRequest {
                method,
                path: path.to_string(),
                body,
            });

        match &self.response {
            Ok(body) => Ok(body.clone()),
            Err(make_error) => Err(make_error()),
        }
    }
}
