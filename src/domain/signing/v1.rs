//! Legacy JSON-RPC style NCANode API.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use super::ports::{SignError, XmlSigner};
use crate::domain::models::{HashAlgorithm, SignResult};
use crate::transport::{RequestScope, Transport};

pub const RPC_VERSION: &str = "1.0";
pub const SIGN_WITH_SECURITY_HEADER: &str = "XML.signWithSecurityHeader";

/// JSON-RPC envelope accepted by the v1 API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignRequest<'a> {
    pub version: &'a str,
    pub method: &'a str,
    pub tsp_hash_algorithm: HashAlgorithm,
    pub params: SignParams<'a>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SignParams<'a> {
    pub p12: &'a str,
    pub password: &'a str,
    pub xml: &'a str,
}

pub struct V1Handler {
    pub(crate) key: SecretString,
    pub(crate) password: SecretString,
    pub(crate) timeout: Duration,
    pub(crate) transport: Arc<dyn Transport>,
}

impl V1Handler {
    pub fn new(
        key: SecretString,
        password: SecretString,
        timeout: Duration,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            key,
            password,
            timeout,
            transport,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Posts a prepared envelope to the service root and decodes the reply.
    ///
    /// A non-200 `status` in the reply is returned as data, not as an error.
    pub async fn execute_request(
        &self,
        cancel: &CancellationToken,
        request: &SignRequest<'_>,
    ) -> Result<SignResult, SignError> {
        let scope = RequestScope::new(cancel, self.timeout);

        let body = serde_json::to_vec(request).map_err(|e| SignError::Encode(e.to_string()))?;
        let response = self
            .transport
            .request(&scope, Method::POST, "", body)
            .await?;

        Ok(serde_json::from_slice(&response)?)
    }
}

impl fmt::Debug for V1Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("V1Handler")
            .field("key", &self.key)
            .field("password", &self.password)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl XmlSigner for V1Handler {
    async fn sign_with_security_header(
        &self,
        cancel: &CancellationToken,
        xml: &[u8],
        algorithm: HashAlgorithm,
    ) -> Result<SignResult, SignError> {
        let xml = std::str::from_utf8(xml).map_err(|e| SignError::Encode(e.to_string()))?;
        debug!(%algorithm, len = xml.len(), "signing xml with v1 api");

        let request = SignRequest {
            version: RPC_VERSION,
            method: SIGN_WITH_SECURITY_HEADER,
            tsp_hash_algorithm: algorithm,
            params: SignParams {
                p12: self.key.expose_secret(),
                password: self.password.expose_secret(),
                xml,
            },
        };

        self.execute_request(cancel, &request).await
    }
}
