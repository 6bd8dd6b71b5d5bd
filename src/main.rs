use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use waconnect::channel::{ChannelConfigResolver, StaticChannelRepository};
use waconnect::config::Config;
use waconnect::media::{HttpTransport, MediaUploader};
use waconnect::{HeaderValidation, Normalizer};

struct Args {
    payload: PathBuf,
    config: PathBuf,
    service_id: Option<String>,
}

fn parse_args() -> Result<Args> {
    let mut payload = None;
    let mut config = PathBuf::from("config.toml");
    let mut service_id = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                config = args
                    .next()
                    .map(PathBuf::from)
                    .context("--config needs a path")?;
            }
            "--service-id" => {
                service_id = Some(args.next().context("--service-id needs a value")?);
            }
            _ if payload.is_none() => payload = Some(PathBuf::from(arg)),
            other => anyhow::bail!("Unexpected argument: {}", other),
        }
    }

    Ok(Args {
        payload: payload
            .context("Usage: waconnect <payload.json> [--config config.toml] [--service-id ID]")?,
        config,
        service_id,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,waconnect=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = parse_args()?;

    info!("Loading configuration from: {}", args.config.display());
    let config = Config::load(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    info!("Configuration loaded successfully");
    info!("  File engine: {}", config.file_engine.url);
    info!("  Channels: {}", config.channels.len());

    let service_id = match args.service_id {
        Some(id) => id,
        None => config
            .channels
            .first()
            .map(|c| c.service_identifier.clone())
            .context("No --service-id given and no channel configured")?,
    };

    let repository = StaticChannelRepository::new(&config.channels);
    let transport = HttpTransport::new(&config.http)?;
    let uploader = MediaUploader::new(
        ChannelConfigResolver::new(Arc::new(repository)),
        Arc::new(transport),
        config.file_engine.clone(),
    );
    let normalizer = Normalizer::new(uploader);

    let raw = std::fs::read_to_string(&args.payload)
        .with_context(|| format!("Failed to read payload: {}", args.payload.display()))?;
    let payload: serde_json::Value =
        serde_json::from_str(&raw).context("Payload is not valid JSON")?;

    let header = HeaderValidation::new(service_id);
    match normalizer.normalize(Some(&payload), Some(&header)).await? {
        Some(message) => println!("{}", serde_json::to_string_pretty(&message)?),
        None => warn!("No message produced for {}", args.payload.display()),
    }

    Ok(())
}
