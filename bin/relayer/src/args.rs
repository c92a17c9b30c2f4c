use crate::constants;
use std::time::Duration;

use alloy_primitives::Address;
use spectre_listener::ListenerConfig;
use spectre_primitives::DomainId;
use spectre_providers::{ROTATE_PROOF_METHOD, STEP_PROOF_METHOD};

/// The arguments of the Spectre relayer.
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "spectre-relayer", version, about = "Relays finalized bridge events and sync committee rotations")]
pub struct RelayerArgs {
    /// The Beacon provider arguments.
    #[command(flatten)]
    pub beacon_provider_args: BeaconProviderArgs,
    /// The execution provider arguments.
    #[command(flatten)]
    pub execution_provider_args: ExecutionProviderArgs,
    /// The prover arguments.
    #[command(flatten)]
    pub prover_args: ProverArgs,
    /// The listener arguments.
    #[command(flatten)]
    pub listener_args: ListenerArgs,
    /// The bridge arguments.
    #[command(flatten)]
    pub bridge_args: BridgeArgs,
    /// The capacity of the outbound message channel, in batches.
    #[arg(long = "channel.capacity", id = "channel_capacity", value_name = "CHANNEL_CAPACITY", env = "SPECTRE_CHANNEL_CAPACITY", default_value_t = constants::DEFAULT_CHANNEL_CAPACITY)]
    pub channel_capacity: usize,
    /// The log filter directives.
    #[arg(long = "log.filter", id = "log_filter", value_name = "LOG_FILTER", env = "RUST_LOG", default_value = constants::DEFAULT_LOG_FILTER)]
    pub log_filter: String,
}

impl RelayerArgs {
    /// Validate that the arguments are compatible with each other.
    pub fn validate(&self) -> Result<(), String> {
        if self.channel_capacity == 0 {
            return Err("Channel capacity must be greater than zero".to_string());
        }

        let domain_id = self.listener_args.domain_id;
        if self.listener_args.destinations.contains(&domain_id) {
            return Err(format!("Destination domains cannot contain the source domain {domain_id}"));
        }

        if self.prover_args.url.is_some() && self.listener_args.destinations.is_empty() {
            return Err("At least one destination domain is required when rotation is enabled"
                .to_string());
        }

        Ok(())
    }
}

/// The arguments for the Beacon provider.
#[derive(Debug, Clone, clap::Args)]
pub struct BeaconProviderArgs {
    /// The URL of the Beacon node REST API.
    #[arg(long = "beacon.url", id = "beacon_url", value_name = "BEACON_URL", env = "SPECTRE_BEACON_URL")]
    pub url: reqwest::Url,
}

/// The arguments for the execution provider.
#[derive(Debug, Clone, clap::Args)]
pub struct ExecutionProviderArgs {
    /// The URL of the execution RPC.
    #[arg(long = "execution.url", id = "execution_url", value_name = "EXECUTION_URL", env = "SPECTRE_EXECUTION_URL")]
    pub url: reqwest::Url,
    /// The compute units per second for the provider.
    #[arg(long = "execution.cups", id = "execution_compute_units_per_second", value_name = "EXECUTION_COMPUTE_UNITS_PER_SECOND", default_value_t = constants::PROVIDER_COMPUTE_UNITS_PER_SECOND)]
    pub compute_units_per_second: u64,
    /// The max amount of retries for the provider.
    #[arg(long = "execution.max-retries", id = "execution_max_retries", value_name = "EXECUTION_MAX_RETRIES", default_value_t = constants::PROVIDER_MAX_RETRIES)]
    pub max_retries: u32,
    /// The initial backoff for the provider.
    #[arg(long = "execution.initial-backoff", id = "execution_initial_backoff", value_name = "EXECUTION_INITIAL_BACKOFF", default_value_t = constants::PROVIDER_INITIAL_BACKOFF)]
    pub initial_backoff: u64,
}

/// The arguments for the light client prover. Sync committee rotations are only relayed when a
/// prover is configured.
#[derive(Debug, Clone, clap::Args)]
pub struct ProverArgs {
    /// The URL of the prover RPC.
    #[arg(long = "prover.url", id = "prover_url", value_name = "PROVER_URL", env = "SPECTRE_PROVER_URL")]
    pub url: Option<reqwest::Url>,
    /// The prover method generating step proofs.
    #[arg(long = "prover.step-method", id = "prover_step_method", value_name = "PROVER_STEP_METHOD", default_value = STEP_PROOF_METHOD)]
    pub step_method: String,
    /// The prover method generating rotation proofs.
    #[arg(long = "prover.rotate-method", id = "prover_rotate_method", value_name = "PROVER_ROTATE_METHOD", default_value = ROTATE_PROOF_METHOD)]
    pub rotate_method: String,
}

/// The arguments for the listener.
#[derive(Debug, Clone, clap::Args)]
pub struct ListenerArgs {
    /// The domain of the monitored chain.
    #[arg(long = "listener.domain-id", id = "listener_domain_id", value_name = "DOMAIN_ID", env = "SPECTRE_DOMAIN_ID")]
    pub domain_id: DomainId,
    /// The domains notified of sync committee rotations.
    #[arg(long = "listener.destinations", id = "listener_destinations", value_name = "DESTINATIONS", env = "SPECTRE_DESTINATIONS", value_delimiter = ',')]
    pub destinations: Vec<DomainId>,
    /// The wait in seconds between two polls without new finality.
    #[arg(long = "listener.retry-interval", id = "listener_retry_interval", value_name = "RETRY_INTERVAL", default_value_t = constants::DEFAULT_RETRY_INTERVAL)]
    pub retry_interval: u64,
    /// The size of the finalized block range handed to the handlers.
    #[arg(long = "listener.block-interval", id = "listener_block_interval", value_name = "BLOCK_INTERVAL", default_value_t = constants::DEFAULT_BLOCK_INTERVAL)]
    pub block_interval: u64,
    /// The epoch the listener starts from.
    #[arg(long = "listener.start-epoch", id = "listener_start_epoch", value_name = "START_EPOCH", default_value_t = 0)]
    pub start_epoch: u64,
}

impl ListenerArgs {
    /// Returns the [`ListenerConfig`] for the arguments.
    pub const fn config(&self) -> ListenerConfig {
        ListenerConfig {
            domain_id: self.domain_id,
            retry_interval: Duration::from_secs(self.retry_interval),
            block_interval: self.block_interval,
        }
    }
}

/// The arguments for the bridge.
#[derive(Debug, Clone, clap::Args)]
pub struct BridgeArgs {
    /// The address of the bridge contract.
    #[arg(long = "bridge.address", id = "bridge_address", value_name = "BRIDGE_ADDRESS", env = "SPECTRE_BRIDGE_ADDRESS")]
    pub address: Address,
}
