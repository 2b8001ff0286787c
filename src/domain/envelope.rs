//! SOAP envelopes for the synchronous SendMessage channel.
//!
//! Documents produced here are ordinary XML and can be passed to any
//! [`XmlSigner`](crate::domain::signing::XmlSigner) to receive a WS-Security
//! header. The signature references the body through its `wsu:Id`.

use serde::{Deserialize, Serialize};

pub mod ns {
    pub const SOAP: &str = "http://schemas.xmlsoap.org/soap/envelope/";
    pub const WSU: &str =
        "http://docs.oasis-open.org/wss/2004/01/oasis-200401-wss-wssecurity-utility-1.0.xsd";
    pub const SYNC_CHANNEL: &str = "http://bip.bee.kz/SyncChannel/v10/Types";
}

#[derive(Debug, thiserror::Error)]
pub enum EnvelopeError {
    #[error("can't serialize soap envelope: {0}")]
    Serialize(#[from] quick_xml::SeError),

    #[error("can't parse soap envelope: {0}")]
    Deserialize(#[from] quick_xml::DeError),
}

/// Outgoing `soap:Envelope` wrapping a single `ns2:SendMessage` request.
///
/// Element names carry their prefixes when serialized and match on the local
/// name when parsed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename(serialize = "soap:Envelope", deserialize = "Envelope"))]
pub struct RequestEnvelope<T> {
    #[serde(rename = "@xmlns:soap")]
    pub xmlns_soap: String,

    #[serde(rename(serialize = "soap:Body", deserialize = "Body"))]
    pub body: RequestBody<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestBody<T> {
    #[serde(rename = "@xmlns:wsu")]
    pub xmlns_wsu: String,

    #[serde(rename(serialize = "@wsu:Id", deserialize = "@Id"))]
    pub wsu_id: String,

    #[serde(rename(serialize = "ns2:SendMessage", deserialize = "SendMessage"))]
    pub send_message: SendMessage<T>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendMessage<T> {
    #[serde(rename = "@xmlns:ns2")]
    pub xmlns_ns2: String,

    pub request: T,
}

impl<T> RequestEnvelope<T> {
    /// Wraps `payload` in a body identified by `body_id`, with the standard
    /// namespace bindings.
    pub fn new(body_id: impl Into<String>, payload: T) -> Self {
        Self {
            xmlns_soap: ns::SOAP.to_string(),
            body: RequestBody {
                xmlns_wsu: ns::WSU.to_string(),
                wsu_id: body_id.into(),
                send_message: SendMessage {
                    xmlns_ns2: ns::SYNC_CHANNEL.to_string(),
                    request: payload,
                },
            },
        }
    }

    pub fn body_id(&self) -> &str {
        &self.body.wsu_id
    }

    pub fn payload(&self) -> &T {
        &self.body.send_message.request
    }

    pub fn into_payload(self) -> T {
        self.body.send_message.request
    }
}

impl<T: Serialize> RequestEnvelope<T> {
    pub fn to_xml(&self) -> Result<String, EnvelopeError> {
        Ok(quick_xml::se::to_string(self)?)
    }
}

impl<T: for<'a> Deserialize<'a>> RequestEnvelope<T> {
    pub fn from_xml(xml: &str) -> Result<Self, EnvelopeError> {
        Ok(quick_xml::de::from_str(xml)?)
    }
}

/// Incoming envelope carrying a `SendMessageResponse`. Any `Header`, such as
/// the signature block, is skipped.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponseEnvelope<T> {
    #[serde(rename = "Body")]
    body: ResponseBody<T>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct ResponseBody<T> {
    #[serde(rename = "SendMessageResponse")]
    send_message_response: SendMessageResponse<T>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct SendMessageResponse<T> {
    response: T,
}

impl<T> ResponseEnvelope<T> {
    pub fn response(&self) -> &T {
        &self.body.send_message_response.response
    }

    pub fn into_response(self) -> T {
        self.body.send_message_response.response
    }
}

impl<T: for<'a> Deserialize<'a>> ResponseEnvelope<T> {
    pub fn parse(xml: &str) -> Result<Self, EnvelopeError> {
        Ok(quick_xml::de::from_str(xml)?)
    }
}
