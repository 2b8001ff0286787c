use std::io::{Read, Write};

use color_eyre::eyre::{Context, eyre};
use ncanode_client::{HashAlgorithm, NcaNode, XmlSigner, config::Config, telemetry};
use tokio_util::sync::CancellationToken;

/// Usage: `ncanode-sign [FILE|-] [HASH_ALGORITHM]`
#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let _ = dotenvy::dotenv();
    telemetry::init_tracing();

    let config = Config::load()?;
    tracing::info!("Loaded configuration: {:?}", config);

    let mut args = std::env::args().skip(1);
    let xml = match args.next().as_deref() {
        None | Some("-") => {
            let mut xml = Vec::new();
            std::io::stdin()
                .read_to_end(&mut xml)
                .context("Reading XML from stdin")?;
            xml
        }
        Some(path) => std::fs::read(path).with_context(|| format!("Reading XML from {path}"))?,
    };
    let algorithm = match args.next() {
        Some(name) => name.parse::<HashAlgorithm>()?,
        None => HashAlgorithm::Sha256,
    };

    let signer = NcaNode::create(config.signer.to_options()?)?;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, cancelling signing request");
            on_interrupt.cancel();
        }
    });

    let result = signer
        .sign_with_security_header(&cancel, &xml, algorithm)
        .await?;

    if !result.is_ok() {
        return Err(eyre!(
            "NCANode returned status {}: {}",
            result.status,
            result.message
        ));
    }

    std::io::stdout()
        .write_all(result.result_xml().as_bytes())
        .context("Writing signed XML")?;
    Ok(())
}
