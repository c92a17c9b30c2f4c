use alloy_transport::{RpcError, TransportErrorKind};

/// An error occurring at one of the providers.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Error at the beacon provider.
    #[error("beacon provider error: {0}")]
    Beacon(#[from] reqwest::Error),
    /// JSON RPC error, from the execution provider or the prover.
    #[error(transparent)]
    Rpc(#[from] RpcError<TransportErrorKind>),
    /// Other error.
    #[error("{0}")]
    Other(&'static str),
}
