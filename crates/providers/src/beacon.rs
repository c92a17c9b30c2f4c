//! Exposes the [`BeaconProvider`] and [`SyncCommitteeFetcher`] traits allowing to retrieve
//! finality information from the Beacon chain.

use crate::ProviderError;
use std::format;

use alloy_primitives::{B256, U64};
use reqwest::Client;

/// The state identifier of the latest finalized Beacon state.
pub const FINALIZED_STATE: &str = "finalized";

/// An implementation of the trait can provide finality information from the Beacon chain.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait BeaconProvider: Sync + Send {
    /// Returns the finality checkpoints for the provided state.
    async fn finality(&self, state: &str) -> Result<FinalityCheckpoints, ProviderError>;
    /// Returns the signed Beacon block for the provided block root.
    async fn signed_beacon_block(
        &self,
        root: B256,
    ) -> Result<ReducedSignedBeaconBlock, ProviderError>;
}

/// An implementation of the trait can provide the sync committee of a Beacon state.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait SyncCommitteeFetcher: Sync + Send {
    /// Returns the sync committee for the provided state.
    async fn sync_committee(&self, state: &str) -> Result<SyncCommittee, ProviderError>;
}

/// The beacon states api method prefix.
const STATES_METHOD_PREFIX: &str = "eth/v1/beacon/states";

/// The signed beacon blocks api method prefix.
const BLOCKS_METHOD_PREFIX: &str = "eth/v2/beacon/blocks";

/// An API response.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct APIResponse<T> {
    /// The data.
    pub data: T,
}

/// A finality checkpoint.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Checkpoint {
    /// The epoch of the checkpoint.
    #[serde(with = "alloy_serde::quantity")]
    pub epoch: u64,
    /// The root of the checkpoint block.
    pub root: B256,
}

/// The finality checkpoints of a Beacon state.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FinalityCheckpoints {
    /// The previous justified checkpoint.
    pub previous_justified: Checkpoint,
    /// The current justified checkpoint.
    pub current_justified: Checkpoint,
    /// The finalized checkpoint.
    pub finalized: Checkpoint,
}

impl FinalityCheckpoints {
    /// Returns the justified checkpoint, ahead of the finalized one.
    pub const fn justified(&self) -> &Checkpoint {
        &self.current_justified
    }
}

/// A reduced signed Beacon block.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReducedSignedBeaconBlock {
    /// The Beacon block.
    pub message: ReducedBeaconBlock,
}

impl ReducedSignedBeaconBlock {
    /// Returns the execution block number of the block, if the block carries an execution
    /// payload.
    pub fn execution_block_number(&self) -> Option<u64> {
        self.message.body.execution_payload.as_ref().map(|payload| payload.block_number)
    }
}

/// A reduced Beacon block.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReducedBeaconBlock {
    /// The slot of the block.
    #[serde(with = "alloy_serde::quantity")]
    pub slot: u64,
    /// The body of the block.
    pub body: ReducedBeaconBlockBody,
}

/// A reduced Beacon block body.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReducedBeaconBlockBody {
    /// The execution payload, absent before the merge.
    #[serde(default)]
    pub execution_payload: Option<ReducedExecutionPayload>,
}

/// A reduced execution payload.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReducedExecutionPayload {
    /// The execution block number.
    #[serde(with = "alloy_serde::quantity")]
    pub block_number: u64,
    /// The execution block hash.
    pub block_hash: B256,
}

/// The sync committee of a Beacon state. Two committees are the same iff they hold the same
/// validators in the same order and subcommittee split.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SyncCommittee {
    /// The validator indices of the committee.
    pub validators: Vec<U64>,
    /// The validator indices split by subcommittee.
    pub validator_aggregates: Vec<Vec<U64>>,
}

/// An online implementation of a Beacon client.
#[derive(Debug, Clone)]
pub struct OnlineBeaconClient {
    /// The base URL of the beacon API.
    pub base: String,
    /// The inner reqwest client.
    pub inner: Client,
}

impl OnlineBeaconClient {
    /// Creates a new [`OnlineBeaconClient`] from the provided base url.
    pub fn new_http(mut base: String) -> Self {
        // If base ends with a slash, remove it
        if base.ends_with('/') {
            base.remove(base.len() - 1);
        }
        Self { base, inner: Client::new() }
    }

    async fn get<T>(&self, path: String) -> Result<T, ProviderError>
    where
        T: serde::de::DeserializeOwned + Send,
    {
        tracing::trace!(target: "spectre::providers", %path, "beacon request");
        let response = self
            .inner
            .get(format!("{}/{}", self.base, path))
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<APIResponse<T>>().await?.data)
    }
}

#[async_trait::async_trait]
impl BeaconProvider for OnlineBeaconClient {
    async fn finality(&self, state: &str) -> Result<FinalityCheckpoints, ProviderError> {
        self.get(format!("{STATES_METHOD_PREFIX}/{state}/finality_checkpoints")).await
    }

    async fn signed_beacon_block(
        &self,
        root: B256,
    ) -> Result<ReducedSignedBeaconBlock, ProviderError> {
        self.get(format!("{BLOCKS_METHOD_PREFIX}/{root}")).await
    }
}

#[async_trait::async_trait]
impl SyncCommitteeFetcher for OnlineBeaconClient {
    async fn sync_committee(&self, state: &str) -> Result<SyncCommittee, ProviderError> {
        self.get(format!("{STATES_METHOD_PREFIX}/{state}/sync_committees")).await
    }
}
