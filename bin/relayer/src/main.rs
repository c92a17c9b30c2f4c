//! The Spectre relayer binary.

use clap::Parser;
use spectre_relayer::{constants::DEFAULT_LOG_FILTER, RelayerArgs};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = RelayerArgs::parse();

    let filter = EnvFilter::try_new(&args.log_filter).unwrap_or_else(|err| {
        eprintln!("Invalid log filter {}: {err}", args.log_filter);
        EnvFilter::new(DEFAULT_LOG_FILTER)
    });
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(target: "spectre::relayer", ?err, "failed to listen for shutdown signal");
            return;
        }
        tracing::info!(target: "spectre::relayer", "received shutdown signal");
        signal.cancel();
    });

    if let Err(err) = spectre_relayer::run(args, shutdown).await {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
