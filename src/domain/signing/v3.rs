//! REST style NCANode 3.x API.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::ports::{SignError, XmlSigner};
use crate::domain::models::{
    HashAlgorithm, STATUS_OK, SignResult, SignedXml, null_as_default,
};
use crate::transport::{RequestScope, Transport};

pub const WSSE_SIGN_PATH: &str = "/wsse/sign";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WsseSignRequest<'a> {
    xml: &'a str,
    key: &'a str,
    password: &'a str,
    key_alias: Option<&'a str>,
    trim_xml: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct WsseSignResponse {
    #[serde(deserialize_with = "null_as_default")]
    status: i64,
    #[serde(deserialize_with = "null_as_default")]
    message: String,
    #[serde(deserialize_with = "null_as_default")]
    xml: String,
}

impl From<WsseSignResponse> for SignResult {
    fn from(response: WsseSignResponse) -> Self {
        SignResult {
            result: SignedXml {
                raw: response.xml.clone(),
                xml: response.xml,
            },
            message: response.message,
            status: response.status,
        }
    }
}

fn signing_error(context: &str, cause: impl fmt::Display) -> SignError {
    SignError::Signing(format!("SignXml: {context}: {cause}"))
}

pub struct V3Handler {
    pub(crate) key: SecretString,
    pub(crate) password: SecretString,
    pub(crate) timeout: Duration,
    pub(crate) transport: Arc<dyn Transport>,
}

impl V3Handler {
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

    fn encode(&self, xml: &[u8]) -> Result<Vec<u8>, SignError> {
        let xml = std::str::from_utf8(xml)
            .map_err(|e| signing_error("can't encode request json", e))?;

        let request = WsseSignRequest {
            xml,
            key: self.key.expose_secret(),
            password: self.password.expose_secret(),
            key_alias: None,
            trim_xml: false,
        };

        serde_json::to_vec(&request).map_err(|e| signing_error("can't encode request json", e))
    }
}

impl fmt::Debug for V3Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("V3Handler")
            .field("key", &self.key)
            .field("password", &self.password)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl XmlSigner for V3Handler {
    /// The digest algorithm is chosen by the service; `_algorithm` is not sent.
    async fn sign_with_security_header(
        &self,
        cancel: &CancellationToken,
        xml: &[u8],
        _algorithm: HashAlgorithm,
    ) -> Result<SignResult, SignError> {
        let scope = RequestScope::new(cancel, self.timeout);

        let body = self.encode(xml)?;
        debug!(len = xml.len(), "signing xml with v3 api");

        let response = self
            .transport
            .request(&scope, Method::POST, WSSE_SIGN_PATH, body)
            .await
            .map_err(|e| signing_error("http request error", e))?;

        let response: WsseSignResponse = serde_json::from_slice(&response)
            .map_err(|e| signing_error("can't decode http response json", e))?;

        if response.status != STATUS_OK {
            warn!(status = response.status, message = %response.message, "service rejected signing request");
            return Err(SignError::Signing(format!(
                "SignXml: http error: {}, status: {}",
                response.message, response.status
            )));
        }

        Ok(response.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::TransportError;
    use crate::transport::fake::FakeTransport;

    fn handler(transport: Arc<FakeTransport>) -> V3Handler {
        V3Handler::new(
            SecretString::from("base64string".to_string()),
            SecretString::from("password".to_string()),
            Duration::from_secs(5),
            transport,
        )
    }

    async fn sign(handler: &V3Handler, xml: &[u8]) -> Result<SignResult, SignError> {
        handler
            .sign_with_security_header(&CancellationToken::new(), xml, HashAlgorithm::Sha256)
            .await
    }

    #[tokio::test]
    async fn test_sign_success() {
        let transport = Arc::new(FakeTransport::responding(
            r#"{"status":200,"message":"Success","xml":"<signedXml></signedXml>"}"#,
        ));
        let handler = handler(transport);

        let result = sign(&handler, b"<xml></xml>")
            .await
            .expect("signing should succeed");

        assert_eq!(result.result_xml(), "<signedXml></signedXml>");
        assert_eq!(result.result_raw(), "<signedXml></signedXml>");
        assert_eq!(result.status, 200);
        assert_eq!(result.message, "Success");
    }

    #[tokio::test]
    async fn test_request_payload() {
        let transport = Arc::new(FakeTransport::responding(
            r#"{"status":200,"message":"Success","xml":"<s/>"}"#,
        ));
        let handler = handler(transport.clone());

        handler
            .sign_with_security_header(&CancellationToken::new(), b"<xml/>", HashAlgorithm::Md5)
            .await
            .expect("signing should succeed");

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, Method::POST);
        assert_eq!(requests[0].path, "/wsse/sign");
        assert_eq!(
            requests[0].json(),
            serde_json::json!({
                "xml": "<xml/>",
                "key": "base64string",
                "password": "password",
                "keyAlias": null,
                "trimXml": false
            })
        );
    }

    #[tokio::test]
    async fn test_non_ok_status() {
        let transport = Arc::new(FakeTransport::responding(
            r#"{"status":400,"message":"Bad Request","xml":""}"#,
        ));
        let handler = handler(transport);

        let err = sign(&handler, b"<xml></xml>").await.unwrap_err();

        assert_eq!(err.to_string(), "SignXml: http error: Bad Request, status: 400");
    }

    #[tokio::test]
    async fn test_null_xml_on_error_response() {
        let transport = Arc::new(FakeTransport::responding(
            r#"{"status":500,"message":"Key not found","xml":null}"#,
        ));
        let handler = handler(transport);

        let err = sign(&handler, b"<xml></xml>").await.unwrap_err();

        assert_eq!(err.to_string(), "SignXml: http error: Key not found, status: 500");
    }

    #[tokio::test]
    async fn test_null_fields_on_success_response() {
        let transport = Arc::new(FakeTransport::responding(
            r#"{"status":200,"message":null,"xml":null}"#,
        ));
        let handler = handler(transport);

        let result = sign(&handler, b"<xml></xml>")
            .await
            .expect("null fields decode as empty");

        assert_eq!(result.result_xml(), "");
        assert_eq!(result.message, "");
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_status_wider_than_i32() {
        let transport = Arc::new(FakeTransport::responding(
            r#"{"status":3000000000,"message":"Overflow","xml":""}"#,
        ));
        let handler = handler(transport);

        let err = sign(&handler, b"<xml></xml>").await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "SignXml: http error: Overflow, status: 3000000000"
        );
    }

    #[tokio::test]
    async fn test_invalid_utf8() {
        let transport = Arc::new(FakeTransport::responding("{}"));
        let handler = handler(transport.clone());

        let err = sign(&handler, &[0xff, 0xfe, 0xfd]).await.unwrap_err();

        assert!(
            err.to_string()
                .starts_with("SignXml: can't encode request json:")
        );
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_transport_error() {
        let transport = Arc::new(FakeTransport::failing(|| {
            TransportError::Connect("request error".to_string())
        }));
        let handler = handler(transport);

        let err = sign(&handler, b"<xml></xml>").await.unwrap_err();

        assert_eq!(
            err.to_string(),
            "SignXml: http request error: http request failed: request error"
        );
    }

    #[tokio::test]
    async fn test_invalid_response_json() {
        let transport = Arc::new(FakeTransport::responding("invalid json"));
        let handler = handler(transport);

        let err = sign(&handler, b"<xml></xml>").await.unwrap_err();

        assert!(matches!(err, SignError::Signing(_)));
        assert!(
            err.to_string()
                .starts_with("SignXml: can't decode http response json:")
        );
    }

    #[tokio::test]
    async fn test_cancelled_call() {
        let transport = Arc::new(FakeTransport::responding(r#"{"status":200}"#));
        let handler = handler(transport);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = handler
            .sign_with_security_header(&cancel, b"<xml/>", HashAlgorithm::Sha256)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "SignXml: http request error: request cancelled");
    }

    #[tokio::test]
    async fn test_repeated_calls_are_identical() {
        let transport = Arc::new(FakeTransport::responding(
            r#"{"status":200,"message":"Success","xml":"<s/>"}"#,
        ));
        let handler = handler(transport);

        let first = sign(&handler, b"<xml/>").await.unwrap();
        let second = sign(&handler, b"<xml/>").await.unwrap();

        assert_eq!(first, second);
    }
}
