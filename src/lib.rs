pub mod config;
pub mod domain;
pub mod telemetry;
pub mod transport;

pub use domain::envelope::{EnvelopeError, RequestEnvelope, ResponseEnvelope};
pub use domain::models::{ApiVersion, HashAlgorithm, SignResult, SignedXml};
pub use domain::signing::{NcaNode, SignError, SignerOptions, V1Handler, V3Handler, XmlSigner};
pub use transport::{HttpTransport, Transport, TransportError};
