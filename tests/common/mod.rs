use std::time::Duration;

use ncanode_client::{ApiVersion, SignerOptions};
use wiremock::MockServer;

pub const KEY: &str = "MIIKbase64key";
pub const PASSWORD: &str = "Qwerty12";

// Helper building signer options that point at the mock server
pub fn options(server: &MockServer, version: Option<ApiVersion>) -> SignerOptions {
    let options = SignerOptions::new(server.uri(), KEY, PASSWORD, Duration::from_secs(5));
    match version {
        Some(version) => options.with_version(version),
        None => options,
    }
}
