use alloy_primitives::B256;
use spectre_primitives::{BlockRange, MessageBatch};
use spectre_providers::ProviderError;
use tokio::sync::mpsc::error::SendError;

/// A [`Result`] that uses [`ListenerError`] as the error type.
pub(crate) type ListenerResult<T> = Result<T, ListenerError>;

/// An error that occurred during a step of the listener.
#[derive(Debug, thiserror::Error)]
pub enum ListenerError {
    /// The finality checkpoints could not be fetched.
    #[error("failed to fetch finality checkpoints: {0}")]
    Finality(#[source] ProviderError),
    /// The Beacon block at the justified root could not be fetched.
    #[error("failed to fetch justified block {root}: {source}")]
    JustifiedBlock {
        /// The justified root.
        root: B256,
        /// The provider error.
        source: ProviderError,
    },
    /// The Beacon block at the justified root does not carry an execution payload.
    #[error("justified block {0} has no execution payload")]
    MissingExecutionPayload(B256),
    /// A handler failed to handle the block range.
    #[error("handler {index} failed for block range {range}: {source}")]
    Handler {
        /// The registration index of the handler.
        index: usize,
        /// The block range of the step.
        range: BlockRange,
        /// The handler error.
        source: HandlerError,
    },
}

impl ListenerError {
    /// Returns true if the error originates from an event handler.
    pub const fn is_handler_error(&self) -> bool {
        matches!(self, Self::Handler { .. })
    }
}

/// An error that occurred in an event handler.
#[derive(Debug, thiserror::Error)]
pub enum HandlerError {
    /// An error at one of the providers.
    #[error(transparent)]
    Provider(#[from] ProviderError),
    /// The outbound message channel was closed.
    #[error("outbound message channel closed")]
    ChannelClosed(#[from] SendError<MessageBatch>),
}
