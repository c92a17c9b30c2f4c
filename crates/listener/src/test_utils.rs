use crate::{EventHandler, HandlerError};
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

use parking_lot::Mutex;
use spectre_primitives::BlockRange;
use spectre_providers::ProviderError;

/// A handler invocation recorded by the [`RecordingHandler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandlerCall {
    /// The identifier of the invoked handler.
    pub handler: usize,
    /// The block range passed to the handler.
    pub range: BlockRange,
}

impl HandlerCall {
    /// Returns an empty invocation log, shareable between handlers.
    pub fn log() -> Arc<Mutex<Vec<Self>>> {
        Arc::new(Mutex::new(Vec::new()))
    }
}

/// An [`EventHandler`] appending each of its invocations to a shared log.
#[derive(Debug)]
pub struct RecordingHandler {
    id: usize,
    calls: Arc<Mutex<Vec<HandlerCall>>>,
}

impl RecordingHandler {
    /// Returns a new [`RecordingHandler`] identified by `id`.
    pub const fn new(id: usize, calls: Arc<Mutex<Vec<HandlerCall>>>) -> Self {
        Self { id, calls }
    }
}

#[async_trait::async_trait]
impl EventHandler for RecordingHandler {
    async fn handle_events(&mut self, range: BlockRange) -> Result<(), HandlerError> {
        self.calls.lock().push(HandlerCall { handler: self.id, range });
        Ok(())
    }
}

/// An [`EventHandler`] failing until [`FailingHandler::recover`] is called. Clones share their
/// state.
#[derive(Debug, Clone)]
pub struct FailingHandler {
    id: usize,
    recovered: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl FailingHandler {
    /// Returns a new failing handler identified by `id`.
    pub fn new(id: usize) -> Self {
        Self { id, recovered: Arc::new(AtomicBool::new(false)), calls: Arc::default() }
    }

    /// Makes the handler succeed from now on.
    pub fn recover(&self) {
        self.recovered.store(true, Ordering::Relaxed);
    }

    /// Returns the amount of invocations.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl EventHandler for FailingHandler {
    async fn handle_events(&mut self, range: BlockRange) -> Result<(), HandlerError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        if self.recovered.load(Ordering::Relaxed) {
            return Ok(());
        }
        tracing::trace!(target: "spectre::handlers", id = self.id, %range, "failing handler");
        Err(ProviderError::Other("handler failure").into())
    }
}
