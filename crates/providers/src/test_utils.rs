//! Test utils for providers.

use crate::{
    BeaconProvider, BlockStorer, Checkpoint, EventFetcher, FinalityCheckpoints, Prover,
    ProviderError, ReducedBeaconBlock, ReducedBeaconBlockBody, ReducedExecutionPayload,
    ReducedSignedBeaconBlock, SyncCommittee, SyncCommitteeFetcher,
};
use std::{
    collections::{HashMap, VecDeque},
    sync::atomic::{AtomicUsize, Ordering},
};

use alloy_primitives::{Address, Bytes, B256, U64};
use alloy_rpc_types_eth::Log;
use parking_lot::Mutex;
use spectre_primitives::{DomainId, Proof};

/// A queue of mocked responses. The last response is repeated once the queue holds a single
/// element.
#[derive(Debug)]
struct Responses<T>(Mutex<VecDeque<Result<T, &'static str>>>);

impl<T> Default for Responses<T> {
    fn default() -> Self {
        Self(Mutex::new(VecDeque::new()))
    }
}

impl<T: Clone> Responses<T> {
    fn push(&self, response: Result<T, &'static str>) {
        self.0.lock().push_back(response);
    }

    fn next(&self, missing: &'static str) -> Result<T, ProviderError> {
        let mut responses = self.0.lock();
        let response =
            if responses.len() > 1 { responses.pop_front() } else { responses.front().cloned() };
        response.unwrap_or(Err(missing)).map_err(ProviderError::Other)
    }
}

/// Returns finality checkpoints with the provided finalized epoch and roots.
pub fn finality_checkpoints(epoch: u64, finalized: B256, justified: B256) -> FinalityCheckpoints {
    FinalityCheckpoints {
        previous_justified: Checkpoint { epoch, root: finalized },
        current_justified: Checkpoint { epoch: epoch + 1, root: justified },
        finalized: Checkpoint { epoch, root: finalized },
    }
}

/// Returns a Beacon block carrying an execution payload at the provided block number.
pub fn beacon_block(block_number: u64) -> ReducedSignedBeaconBlock {
    ReducedSignedBeaconBlock {
        message: ReducedBeaconBlock {
            slot: block_number,
            body: ReducedBeaconBlockBody {
                execution_payload: Some(ReducedExecutionPayload {
                    block_number,
                    block_hash: B256::with_last_byte(block_number as u8),
                }),
            },
        },
    }
}

/// Returns a sync committee made of the provided validator indices.
pub fn sync_committee(validators: impl IntoIterator<Item = u64>) -> SyncCommittee {
    let validators: Vec<_> = validators.into_iter().map(U64::from).collect();
    SyncCommittee { validator_aggregates: vec![validators.clone()], validators }
}

/// A mock implementation of the [`BeaconProvider`] and [`SyncCommitteeFetcher`] traits.
#[derive(Debug, Default)]
pub struct MockBeaconProvider {
    finality: Responses<FinalityCheckpoints>,
    blocks: Mutex<HashMap<B256, ReducedSignedBeaconBlock>>,
    committees: Responses<SyncCommittee>,
    finality_calls: AtomicUsize,
    block_calls: AtomicUsize,
    committee_calls: AtomicUsize,
}

impl MockBeaconProvider {
    /// Queues a finality response.
    pub fn push_finality(&self, checkpoints: FinalityCheckpoints) -> &Self {
        self.finality.push(Ok(checkpoints));
        self
    }

    /// Queues a failing finality response.
    pub fn push_finality_error(&self, error: &'static str) -> &Self {
        self.finality.push(Err(error));
        self
    }

    /// Registers the Beacon block returned for the root.
    pub fn insert_block(&self, root: B256, block: ReducedSignedBeaconBlock) -> &Self {
        self.blocks.lock().insert(root, block);
        self
    }

    /// Queues a sync committee response.
    pub fn push_sync_committee(&self, committee: SyncCommittee) -> &Self {
        self.committees.push(Ok(committee));
        self
    }

    /// Queues a failing sync committee response.
    pub fn push_sync_committee_error(&self, error: &'static str) -> &Self {
        self.committees.push(Err(error));
        self
    }

    /// Returns the amount of finality requests.
    pub fn finality_calls(&self) -> usize {
        self.finality_calls.load(Ordering::Relaxed)
    }

    /// Returns the amount of Beacon block requests.
    pub fn block_calls(&self) -> usize {
        self.block_calls.load(Ordering::Relaxed)
    }

    /// Returns the amount of sync committee requests.
    pub fn committee_calls(&self) -> usize {
        self.committee_calls.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl BeaconProvider for MockBeaconProvider {
    async fn finality(&self, _state: &str) -> Result<FinalityCheckpoints, ProviderError> {
        self.finality_calls.fetch_add(1, Ordering::Relaxed);
        self.finality.next("no finality response")
    }

    async fn signed_beacon_block(
        &self,
        root: B256,
    ) -> Result<ReducedSignedBeaconBlock, ProviderError> {
        self.block_calls.fetch_add(1, Ordering::Relaxed);
        self.blocks.lock().get(&root).cloned().ok_or(ProviderError::Other("unknown block root"))
    }
}

#[async_trait::async_trait]
impl SyncCommitteeFetcher for MockBeaconProvider {
    async fn sync_committee(&self, _state: &str) -> Result<SyncCommittee, ProviderError> {
        self.committee_calls.fetch_add(1, Ordering::Relaxed);
        self.committees.next("no sync committee response")
    }
}

/// A request recorded by the [`MockEventFetcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRequest {
    /// The contract address.
    pub address: Address,
    /// The event signature.
    pub signature: String,
    /// The first block of the request.
    pub from_block: u64,
    /// The last block of the request.
    pub to_block: u64,
}

/// A mock implementation of the [`EventFetcher`] trait. Returns no logs once the queued responses
/// are consumed.
#[derive(Debug, Default)]
pub struct MockEventFetcher {
    responses: Mutex<VecDeque<Result<Vec<Log>, &'static str>>>,
    requests: Mutex<Vec<LogRequest>>,
}

impl MockEventFetcher {
    /// Queues the logs returned by the next request.
    pub fn push_logs(&self, logs: Vec<Log>) -> &Self {
        self.responses.lock().push_back(Ok(logs));
        self
    }

    /// Queues a failure for the next request.
    pub fn push_error(&self, error: &'static str) -> &Self {
        self.responses.lock().push_back(Err(error));
        self
    }

    /// Returns the recorded requests.
    pub fn requests(&self) -> Vec<LogRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait::async_trait]
impl EventFetcher for MockEventFetcher {
    async fn fetch_event_logs(
        &self,
        address: Address,
        signature: &str,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<Log>, ProviderError> {
        self.requests.lock().push(LogRequest {
            address,
            signature: signature.to_string(),
            from_block,
            to_block,
        });
        self.responses.lock().pop_front().unwrap_or(Ok(vec![])).map_err(ProviderError::Other)
    }
}

/// A mock implementation of the [`Prover`] trait.
#[derive(Debug)]
pub struct MockProver {
    step: Result<Proof, &'static str>,
    rotate: Result<Proof, &'static str>,
    step_calls: AtomicUsize,
    rotate_calls: AtomicUsize,
}

impl Default for MockProver {
    fn default() -> Self {
        Self {
            step: Ok(Proof(Bytes::from_static(b"step"))),
            rotate: Ok(Proof(Bytes::from_static(b"rotate"))),
            step_calls: AtomicUsize::new(0),
            rotate_calls: AtomicUsize::new(0),
        }
    }
}

impl MockProver {
    /// Returns a prover failing step proofs.
    pub fn failing_step(error: &'static str) -> Self {
        Self { step: Err(error), ..Default::default() }
    }

    /// Returns a prover failing rotation proofs.
    pub fn failing_rotate(error: &'static str) -> Self {
        Self { rotate: Err(error), ..Default::default() }
    }

    /// Returns the amount of step proof requests.
    pub fn step_calls(&self) -> usize {
        self.step_calls.load(Ordering::Relaxed)
    }

    /// Returns the amount of rotation proof requests.
    pub fn rotate_calls(&self) -> usize {
        self.rotate_calls.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl Prover for MockProver {
    async fn step_proof(&self, _block_number: u64) -> Result<Proof, ProviderError> {
        self.step_calls.fetch_add(1, Ordering::Relaxed);
        self.step.clone().map_err(ProviderError::Other)
    }

    async fn rotate_proof(&self, _block_number: u64) -> Result<Proof, ProviderError> {
        self.rotate_calls.fetch_add(1, Ordering::Relaxed);
        self.rotate.clone().map_err(ProviderError::Other)
    }
}

/// A [`BlockStorer`] which always fails.
#[derive(Debug, Default)]
pub struct FailingBlockStore {
    calls: AtomicUsize,
}

impl FailingBlockStore {
    /// Returns the amount of store requests.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl BlockStorer for FailingBlockStore {
    async fn store_block(&self, _epoch: u64, _domain_id: DomainId) -> Result<(), ProviderError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Err(ProviderError::Other("store unavailable"))
    }
}
