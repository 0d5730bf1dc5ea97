//! DexScreener adapter binary
//!
//! Streams the screener's pairs feed and writes extracted token batches to
//! stdout as JSON lines. Logs go to stderr.

use adapter_service::{BatchSink, JsonLinesSink};
use anyhow::{Context, Result};
use clap::Parser;
use dexscreener_adapter::{DexScreenerConfig, LoggingConfig, StreamLoop};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dexscreener_adapter")]
#[command(about = "Extracts token profiles from the DexScreener pairs stream")]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "dexscreener.toml")]
    config: PathBuf,

    /// Stream endpoint, overriding the URL built from the query
    #[arg(long)]
    endpoint: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,

    /// Extract a single frame and exit
    #[arg(long)]
    once: bool,
}

fn init_tracing(logging: &LoggingConfig, debug: bool, json: bool) -> Result<()> {
    let default_level = if debug { "debug" } else { logging.level.as_str() };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .with_context(|| format!("Invalid log filter: {default_level}"))?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if json {
        builder.json().init();
    } else {
        builder.init();
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = DexScreenerConfig::from_toml_with_env_overrides(&args.config)?;
    if let Some(endpoint) = args.endpoint {
        config.endpoint = Some(endpoint);
    }

    init_tracing(
        &config.logging,
        args.debug,
        args.json_logs || config.logging.json,
    )?;
    config.validate()?;

    info!("Starting DexScreener adapter");
    info!("Stream URL: {}", config.websocket_url());

    let sink: Arc<dyn BatchSink> = Arc::new(JsonLinesSink::stdout(config.stream.top_tokens));
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let mut stream = StreamLoop::from_config(&config, sink, shutdown_rx)?;

    if args.once {
        let batch = stream.run_once().await?;
        info!(
            tokens = batch.total_extracted(),
            high_confidence = batch.high_confidence_count(),
            "Single extraction complete"
        );
        return Ok(());
    }

    tokio::spawn(async move {
        match signal::ctrl_c().await {
            Ok(()) => info!("Shutdown signal received"),
            Err(e) => warn!("Failed to listen for shutdown signal: {}", e),
        }
        shutdown_tx.send(true).ok();
    });

    stream.run().await?;

    info!("DexScreener adapter stopped");
    Ok(())
}
