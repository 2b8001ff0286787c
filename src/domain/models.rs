//! Data shapes shared by both NCANode protocol versions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// HTTP status the remote service reports for a successful signature.
pub const STATUS_OK: i64 = 200;

/// Decodes an explicit JSON `null` as the field's default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Digest algorithm used by the remote service when computing the signature.
///
/// Only the v1 wire format carries it; v3 negotiates the digest server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HashAlgorithm {
    #[serde(rename = "GOST34311")]
    Gost34311,
    #[serde(rename = "GOST34311GT")]
    Gost34311Gt,
    #[serde(rename = "MD5")]
    Md5,
    #[serde(rename = "SHA1")]
    Sha1,
    #[serde(rename = "SHA224")]
    Sha224,
    #[serde(rename = "SHA256")]
    Sha256,
    #[serde(rename = "SHA384")]
    Sha384,
    #[serde(rename = "SHA512")]
    Sha512,
    #[serde(rename = "RIPEMD128")]
    Ripemd128,
    #[serde(rename = "RIPEMD160")]
    Ripemd160,
    #[serde(rename = "RIPEMD256")]
    Ripemd256,
}

impl HashAlgorithm {
    pub const ALL: [HashAlgorithm; 11] = [
        HashAlgorithm::Gost34311,
        HashAlgorithm::Gost34311Gt,
        HashAlgorithm::Md5,
        HashAlgorithm::Sha1,
        HashAlgorithm::Sha224,
        HashAlgorithm::Sha256,
        HashAlgorithm::Sha384,
        HashAlgorithm::Sha512,
        HashAlgorithm::Ripemd128,
        HashAlgorithm::Ripemd160,
        HashAlgorithm::Ripemd256,
    ];

    /// Name of the algorithm as sent in `tspHashAlgorithm`.
    pub fn as_str(&self) -> &'static str {
        match self {
            HashAlgorithm::Gost34311 => "GOST34311",
            HashAlgorithm::Gost34311Gt => "GOST34311GT",
            HashAlgorithm::Md5 => "MD5",
            HashAlgorithm::Sha1 => "SHA1",
            HashAlgorithm::Sha224 => "SHA224",
            HashAlgorithm::Sha256 => "SHA256",
            HashAlgorithm::Sha384 => "SHA384",
            HashAlgorithm::Sha512 => "SHA512",
            HashAlgorithm::Ripemd128 => "RIPEMD128",
            HashAlgorithm::Ripemd160 => "RIPEMD160",
            HashAlgorithm::Ripemd256 => "RIPEMD256",
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown hash algorithm: {0}")]
pub struct UnknownHashAlgorithm(pub String);

impl FromStr for HashAlgorithm {
    type Err = UnknownHashAlgorithm;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        HashAlgorithm::ALL
            .into_iter()
            .find(|algorithm| algorithm.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownHashAlgorithm(s.to_string()))
    }
}

/// NCANode API generation a signer talks to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// Legacy JSON-RPC style API (NCANode 1.x/2.x).
    #[default]
    V1,
    /// REST style API (NCANode 3.x).
    V3,
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiVersion::V1 => f.write_str("v1"),
            ApiVersion::V3 => f.write_str("v3"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown version: {0}")]
pub struct UnknownVersion(pub String);

impl FromStr for ApiVersion {
    type Err = UnknownVersion;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" | "1.0" => Ok(ApiVersion::V1),
            "v3" | "3" | "3.0" => Ok(ApiVersion::V3),
            _ => Err(UnknownVersion(s.to_string())),
        }
    }
}

/// Signed document as returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignedXml {
    #[serde(deserialize_with = "null_as_default")]
    pub xml: String,
    #[serde(deserialize_with = "null_as_default")]
    pub raw: String,
}

/// Uniform result of a signing call, whatever the protocol version.
///
/// The v1 response body decodes into this type as-is. The v3 backend fills
/// `result.xml` and `result.raw` with the same document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignResult {
    #[serde(deserialize_with = "null_as_default")]
    pub result: SignedXml,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: i64,
}

impl SignResult {
    pub fn result_xml(&self) -> &str {
        &self.result.xml
    }

    pub fn result_raw(&self) -> &str {
        &self.result.raw
    }

    /// Whether the remote service reported success.
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}
