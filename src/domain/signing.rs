//! Version dispatch for the NCANode signing backends.

mod ports;
pub mod v1;
pub mod v3;

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub use ports::{SignError, SignerOptions, XmlSigner};
pub use v1::V1Handler;
pub use v3::V3Handler;

use crate::domain::models::{ApiVersion, HashAlgorithm, SignResult};
use crate::transport::{HttpTransport, Transport};

/// A signer bound to one NCANode API version, chosen at construction.
#[derive(Debug)]
pub enum NcaNode {
    V1(V1Handler),
    V3(V3Handler),
}

impl NcaNode {
    /// Builds the backend matching `options.version` (v1 when unset) on top of
    /// an [`HttpTransport`] for `options.service_url`.
    ///
    /// # Errors
    /// Fails if the HTTP client cannot be created.
    pub fn create(options: SignerOptions) -> Result<Self, SignError> {
        let transport = HttpTransport::new(options.service_url.clone())?;
        Ok(Self::with_transport(options, Arc::new(transport)))
    }

    /// Same as [`NcaNode::create`] with a caller supplied transport.
    pub fn with_transport(options: SignerOptions, transport: Arc<dyn Transport>) -> Self {
        let version = options.resolved_version();
        info!(%version, url = %options.service_url, "creating NCANode signer");

        let SignerOptions {
            key,
            password,
            timeout,
            ..
        } = options;

        match version {
            ApiVersion::V1 => NcaNode::V1(V1Handler::new(key, password, timeout, transport)),
            ApiVersion::V3 => NcaNode::V3(V3Handler::new(key, password, timeout, transport)),
        }
    }

    pub fn version(&self) -> ApiVersion {
        match self {
            NcaNode::V1(_) => ApiVersion::V1,
            NcaNode::V3(_) => ApiVersion::V3,
        }
    }
}

#[async_trait]
impl XmlSigner for NcaNode {
    async fn sign_with_security_header(
        &self,
        cancel: &CancellationToken,
        xml: &[u8],
        algorithm: HashAlgorithm,
    ) -> Result<SignResult, SignError> {
        match self {
            NcaNode::V1(handler) => {
                handler
                    .sign_with_security_header(cancel, xml, algorithm)
                    .await
            }
            NcaNode::V3(handler) => {
                handler
                    .sign_with_security_header(cancel, xml, algorithm)
                    .await
            }
        }
    }
}
