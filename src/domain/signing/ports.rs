//! Ports (interfaces) for the signing domain.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::SecretString;
use tokio_util::sync::CancellationToken;

use crate::domain::models::{ApiVersion, HashAlgorithm, SignResult};
use crate::transport::TransportError;

/// Errors returned by a signing backend.
///
/// The v1 backend surfaces the underlying failure kind as-is. The v3 backend
/// folds every failure into [`SignError::Signing`] with a `SignXml:` prefix.
#[derive(Debug, thiserror::Error)]
pub enum SignError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("can't encode request json: {0}")]
    Encode(String),

    #[error("can't decode response json: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("{0}")]
    Signing(String),
}

/// Signs XML documents with a WS-Security header through a remote NCANode.
#[async_trait]
pub trait XmlSigner: Send + Sync {
    /// Sends `xml` to the service and returns the signed document.
    ///
    /// `xml` must be valid UTF-8. `algorithm` is only transmitted by the v1
    /// protocol. The call fails with a cancellation error if `cancel` fires
    /// before the service answers.
    async fn sign_with_security_header(
        &self,
        cancel: &CancellationToken,
        xml: &[u8],
        algorithm: HashAlgorithm,
    ) -> Result<SignResult, SignError>;
}

/// Construction inputs for a signer.
#[derive(Debug, Clone)]
pub struct SignerOptions {
    pub service_url: String,
    /// Base64 encoded PKCS#12 keystore.
    pub key: SecretString,
    pub password: SecretString,
    pub timeout: Duration,
    /// `None` selects [`ApiVersion::V1`].
    pub version: Option<ApiVersion>,
}

impl SignerOptions {
    pub fn new(
        service_url: impl Into<String>,
        key: impl Into<String>,
        password: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        Self {
            service_url: service_url.into(),
            key: SecretString::from(key.into()),
            password: SecretString::from(password.into()),
            timeout,
            version: None,
        }
    }

    pub fn with_version(mut self, version: ApiVersion) -> Self {
        self.version = Some(version);
        self
    }

    pub fn resolved_version(&self) -> ApiVersion {
        self.version.unwrap_or_default()
    }
}
