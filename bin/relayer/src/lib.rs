//! The Spectre relayer: follows the finality of a chain and relays its bridge deposits and sync
//! committee rotations.

mod args;
pub use args::{
    BeaconProviderArgs, BridgeArgs, ExecutionProviderArgs, ListenerArgs, ProverArgs, RelayerArgs,
};

pub mod constants;

mod sink;
pub use sink::drain_messages;

use alloy_provider::ProviderBuilder;
use alloy_rpc_client::RpcClient;
use alloy_transport::layers::RetryBackoffLayer;
use spectre_listener::{DepositEventHandler, EventHandler, Listener, RotateEventHandler};
use spectre_providers::{AlloyEventFetcher, InMemoryBlockStore, OnlineBeaconClient, RpcProver};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Builds the providers and handlers from the arguments and runs the listener until the shutdown
/// token is cancelled. Returns once every relayed message was drained from the channel.
pub async fn run(args: RelayerArgs, shutdown: CancellationToken) -> eyre::Result<()> {
    args.validate().map_err(|err| eyre::eyre!(err))?;

    let config = args.listener_args.config();
    tracing::info!(target: "spectre::relayer", ?config, bridge = %args.bridge_args.address, "starting relayer");

    let beacon_provider =
        Arc::new(OnlineBeaconClient::new_http(args.beacon_provider_args.url.to_string()));

    let ExecutionProviderArgs { url, max_retries, initial_backoff, compute_units_per_second } =
        args.execution_provider_args;
    let client = RpcClient::builder()
        .layer(RetryBackoffLayer::new(max_retries, initial_backoff, compute_units_per_second))
        .http(url);
    let execution_provider = ProviderBuilder::new().connect_client(client);

    let (tx, rx) = mpsc::channel(args.channel_capacity);
    let mut handlers: Vec<Box<dyn EventHandler>> = vec![Box::new(DepositEventHandler::new(
        tx.clone(),
        AlloyEventFetcher::new(execution_provider),
        args.bridge_args.address,
        config.domain_id,
    ))];

    if let Some(url) = args.prover_args.url {
        tracing::info!(target: "spectre::relayer", destinations = ?args.listener_args.destinations, "sync committee rotation enabled");
        let prover = RpcProver::with_methods(
            RpcClient::new_http(url),
            args.prover_args.step_method,
            args.prover_args.rotate_method,
        );
        handlers.push(Box::new(RotateEventHandler::new(
            config.domain_id,
            args.listener_args.destinations,
            tx.clone(),
            beacon_provider.clone(),
            prover,
        )));
    }
    drop(tx);

    let listener = Listener::new(beacon_provider, handlers, config)
        .with_block_store(Arc::new(InMemoryBlockStore::default()));
    let sink = tokio::spawn(drain_messages(rx));

    listener.run(shutdown, args.listener_args.start_epoch).await;

    let relayed = sink.await?;
    tracing::info!(target: "spectre::relayer", relayed, "relayer stopped");

    Ok(())
}
