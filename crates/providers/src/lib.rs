//! The crate exposes the providers consumed by the Spectre listener along with their online
//! implementations.

pub use beacon::{
    APIResponse, BeaconProvider, Checkpoint, FinalityCheckpoints, OnlineBeaconClient,
    ReducedBeaconBlock, ReducedBeaconBlockBody, ReducedExecutionPayload, ReducedSignedBeaconBlock,
    SyncCommittee, SyncCommitteeFetcher, FINALIZED_STATE,
};
mod beacon;

pub use error::ProviderError;
mod error;

pub use events::{AlloyEventFetcher, EventFetcher};
mod events;

pub use prover::{Prover, RpcProver, ROTATE_PROOF_METHOD, STEP_PROOF_METHOD};
mod prover;

pub use store::{BlockStorer, InMemoryBlockStore};
mod store;

#[cfg(any(test, feature = "test-utils"))]
/// Common test helpers
pub mod test_utils;
