use std::{collections::HashMap, path::PathBuf, time::Duration};

use base64::{Engine as _, engine::general_purpose::STANDARD};
use config::{Config as ConfigLib, Environment, File};
use secrecy::SecretString;
use serde::Deserialize;

use crate::domain::models::{ApiVersion, UnknownVersion};
use crate::domain::signing::SignerOptions;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub signer: SignerConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SignerConfig {
    pub url: String,
    /// Inline base64 encoded PKCS#12 keystore.
    #[serde(default)]
    pub key_base64: Option<SecretString>,
    /// Path to a binary PKCS#12 keystore, encoded to base64 on load.
    #[serde(default)]
    pub key_path: Option<PathBuf>,
    pub password: SecretString,
    pub timeout_secs: u64,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Load(#[from] config::ConfigError),

    #[error("no signing key configured: set signer.key_base64 or signer.key_path")]
    MissingKey,

    #[error("signer.key_base64 and signer.key_path are mutually exclusive")]
    ConflictingKey,

    #[error("failed to read signing key from {path}: {source}")]
    KeyFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    UnknownVersion(#[from] UnknownVersion),

    #[error("signer.timeout_secs must be greater than zero")]
    InvalidTimeout,
}

impl SignerConfig {
    /// Protocol version selected by the configuration. Blank means unset.
    pub fn api_version(&self) -> Result<Option<ApiVersion>, ConfigError> {
        match self.version.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(version) => Ok(Some(version.parse()?)),
        }
    }

    fn key(&self) -> Result<SecretString, ConfigError> {
        match (&self.key_base64, &self.key_path) {
            (Some(_), Some(_)) => Err(ConfigError::ConflictingKey),
            (Some(key), None) => Ok(key.clone()),
            (None, Some(path)) => {
                let der = std::fs::read(path).map_err(|source| ConfigError::KeyFile {
                    path: path.clone(),
                    source,
                })?;
                Ok(SecretString::from(STANDARD.encode(der)))
            }
            (None, None) => Err(ConfigError::MissingKey),
        }
    }

    /// Resolves the configuration into signer construction inputs.
    pub fn to_options(&self) -> Result<SignerOptions, ConfigError> {
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout);
        }

        Ok(SignerOptions {
            service_url: self.url.clone(),
            key: self.key()?,
            password: self.password.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            version: self.api_version()?,
        })
    }
}

impl Config {
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with_sources(None)
    }

    pub fn load_with_sources(
        env_vars: Option<HashMap<String, String>>,
    ) -> Result<Self, ConfigError> {
        let mut builder = ConfigLib::builder()
            .set_default("signer.url", "http://localhost:14579")?
            .set_default("signer.password", "")?
            .set_default("signer.timeout_secs", 30)?
            .add_source(File::with_name("config/settings").required(false));

        // Explicit overrides replace the process environment so tests stay isolated
        if let Some(vars) = env_vars {
            for (key, value) in vars {
                builder = builder.set_override(&key, value)?;
            }
        } else {
            // e.g. APP_SIGNER__URL or APP_SIGNER__KEY_BASE64
            builder = builder.add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__"),
            );
        }

        Ok(builder.build()?.try_deserialize()?)
    }
}
