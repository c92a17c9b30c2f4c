//! Finality-driven chain listener for the Spectre relayer.
//!
//! The [`Listener`] polls the Beacon chain finality, derives the finalized execution block range
//! of each new checkpoint and dispatches it to the registered [`EventHandler`]s, which write the
//! resulting [`MessageBatch`](spectre_primitives::MessageBatch)es to the outbound channel.

mod error;
pub use error::{HandlerError, ListenerError};

pub mod handlers;
pub use handlers::{DepositEventHandler, EventHandler, RotateEventHandler};

mod metrics;
pub use metrics::{DepositHandlerMetrics, ListenerMetrics, RotateHandlerMetrics};

#[cfg(any(test, feature = "test-utils"))]
/// Common test helpers
pub mod test_utils;

use alloy_primitives::B256;
use error::ListenerResult;
use spectre_primitives::{BlockRange, DomainId};
use spectre_providers::{BeaconProvider, BlockStorer, FINALIZED_STATE};
use std::{sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;

/// The configuration of a [`Listener`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerConfig {
    /// The domain of the monitored chain.
    pub domain_id: DomainId,
    /// The wait between two polls when no new finality is available or a poll failed.
    pub retry_interval: Duration,
    /// The size of the block range handed to the handlers.
    pub block_interval: u64,
}

/// The outcome of a single [`Listener::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The finalized checkpoint did not change since the last advance.
    Idle,
    /// Every handler succeeded for the range and the listener advanced to the checkpoint.
    Advanced {
        /// The block range handed to the handlers.
        range: BlockRange,
        /// The root of the finalized checkpoint.
        root: B256,
    },
}

/// The listener follows the finality of a chain and dispatches finalized block ranges to its
/// handlers, in registration order.
#[derive(Debug)]
pub struct Listener<BP> {
    /// The Beacon provider.
    beacon_provider: BP,
    /// The ordered event handlers.
    handlers: Vec<Box<dyn EventHandler>>,
    /// The optional block bookkeeping collaborator.
    block_store: Option<Arc<dyn BlockStorer>>,
    /// The listener configuration.
    config: ListenerConfig,
    /// The root of the last finalized checkpoint handled by every handler.
    latest_checkpoint: B256,
    /// The metrics for the listener.
    metrics: ListenerMetrics,
}

impl<BP> Listener<BP>
where
    BP: BeaconProvider,
{
    /// Returns a new [`Listener`].
    pub fn new(
        beacon_provider: BP,
        handlers: Vec<Box<dyn EventHandler>>,
        config: ListenerConfig,
    ) -> Self {
        Self {
            beacon_provider,
            handlers,
            block_store: None,
            config,
            latest_checkpoint: B256::ZERO,
            metrics: ListenerMetrics::default(),
        }
    }

    /// Records the finalized epoch of each handled checkpoint in the provided store.
    pub fn with_block_store(mut self, block_store: Arc<dyn BlockStorer>) -> Self {
        self.block_store = Some(block_store);
        self
    }

    /// Returns the root of the last handled checkpoint.
    pub const fn latest_checkpoint(&self) -> B256 {
        self.latest_checkpoint
    }

    /// Main execution loop for the [`Listener`]. Returns once the shutdown token is cancelled,
    /// which is only checked between two steps.
    pub async fn run(mut self, shutdown: CancellationToken, epoch: u64) {
        tracing::info!(target: "spectre::listener", domain_id = self.config.domain_id, epoch, handlers = self.handlers.len(), "starting listener");

        loop {
            if shutdown.is_cancelled() {
                tracing::info!(target: "spectre::listener", domain_id = self.config.domain_id, "shutting down listener");
                return;
            }

            match self.step().await {
                Ok(StepOutcome::Advanced { .. }) => continue,
                Ok(StepOutcome::Idle) => {}
                Err(err) => {
                    tracing::warn!(target: "spectre::listener", domain_id = self.config.domain_id, %err, "listener step failed")
                }
            }

            tokio::time::sleep(self.config.retry_interval).await;
        }
    }

    /// Polls the finality once and, if a new checkpoint is available, dispatches its block range
    /// to every handler. The checkpoint is only marked as handled once all handlers succeeded.
    pub async fn step(&mut self) -> ListenerResult<StepOutcome> {
        self.metrics.ticks.increment(1);

        let checkpoints = self.beacon_provider.finality(FINALIZED_STATE).await.map_err(|err| {
            self.metrics.upstream_failures.increment(1);
            ListenerError::Finality(err)
        })?;

        let finalized = checkpoints.finalized;
        if finalized.root == self.latest_checkpoint {
            tracing::trace!(target: "spectre::listener", root = ?finalized.root, "no new finality");
            self.metrics.idle_ticks.increment(1);
            return Ok(StepOutcome::Idle);
        }

        let justified_root = checkpoints.justified().root;
        let block = self
            .beacon_provider
            .signed_beacon_block(justified_root)
            .await
            .map_err(|source| ListenerError::JustifiedBlock { root: justified_root, source })
            .inspect_err(|_| self.metrics.upstream_failures.increment(1))?;
        let end = block.execution_block_number().ok_or_else(|| {
            self.metrics.upstream_failures.increment(1);
            ListenerError::MissingExecutionPayload(justified_root)
        })?;

        let range = BlockRange::ending_at(end, self.config.block_interval);
        tracing::debug!(target: "spectre::listener", domain_id = self.config.domain_id, start_block = range.start, end_block = range.end, "handling finalized range");

        for (index, handler) in self.handlers.iter_mut().enumerate() {
            if let Err(source) = handler.handle_events(range).await {
                self.metrics.handler_failures.increment(1);
                return Err(ListenerError::Handler { index, range, source });
            }
        }

        self.latest_checkpoint = finalized.root;
        self.metrics.advanced_checkpoints.increment(1);
        self.metrics.last_end_block.set(range.end as f64);

        if let Some(store) = &self.block_store {
            if let Err(err) = store.store_block(finalized.epoch, self.config.domain_id).await {
                tracing::warn!(target: "spectre::listener", epoch = finalized.epoch, %err, "failed to store finalized block");
            }
        }

        Ok(StepOutcome::Advanced { range, root: finalized.root })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FailingHandler, HandlerCall, RecordingHandler};
    use alloy_primitives::b256;
    use spectre_providers::{
        test_utils::{beacon_block, finality_checkpoints, FailingBlockStore, MockBeaconProvider},
        InMemoryBlockStore,
    };

    const FINALIZED_ROOT: B256 =
        b256!("0x0000000000000000000000000000000000000000000000000000000000000001");
    const JUSTIFIED_ROOT: B256 =
        b256!("0x0000000000000000000000000000000000000000000000000000000000000002");
    const NEXT_FINALIZED_ROOT: B256 =
        b256!("0x0000000000000000000000000000000000000000000000000000000000000003");
    const NEXT_JUSTIFIED_ROOT: B256 =
        b256!("0x0000000000000000000000000000000000000000000000000000000000000004");

    const CONFIG: ListenerConfig =
        ListenerConfig { domain_id: 1, retry_interval: Duration::from_millis(1), block_interval: 4 };

    fn beacon_provider() -> Arc<MockBeaconProvider> {
        let provider = Arc::new(MockBeaconProvider::default());
        provider
            .push_finality(finality_checkpoints(10, FINALIZED_ROOT, JUSTIFIED_ROOT))
            .insert_block(JUSTIFIED_ROOT, beacon_block(100))
            .insert_block(NEXT_JUSTIFIED_ROOT, beacon_block(132));
        provider
    }

    #[tokio::test]
    async fn test_should_dispatch_finalized_range_in_order() -> eyre::Result<()> {
        let provider = beacon_provider();
        let calls = HandlerCall::log();
        let handlers: Vec<Box<dyn EventHandler>> = vec![
            Box::new(RecordingHandler::new(0, calls.clone())),
            Box::new(RecordingHandler::new(1, calls.clone())),
        ];
        let mut listener = Listener::new(provider, handlers, CONFIG);

        let outcome = listener.step().await?;

        let range = BlockRange::new(96, 100);
        assert_eq!(outcome, StepOutcome::Advanced { range, root: FINALIZED_ROOT });
        assert_eq!(
            *calls.lock(),
            vec![HandlerCall { handler: 0, range }, HandlerCall { handler: 1, range }]
        );
        assert_eq!(listener.latest_checkpoint(), FINALIZED_ROOT);

        Ok(())
    }

    #[tokio::test]
    async fn test_should_not_invoke_handlers_for_unchanged_checkpoint() -> eyre::Result<()> {
        let provider = beacon_provider();
        let calls = HandlerCall::log();
        let handlers: Vec<Box<dyn EventHandler>> =
            vec![Box::new(RecordingHandler::new(0, calls.clone()))];
        let mut listener = Listener::new(provider.clone(), handlers, CONFIG);

        listener.step().await?;
        let outcome = listener.step().await?;

        assert_eq!(outcome, StepOutcome::Idle);
        assert_eq!(calls.lock().len(), 1);
        assert_eq!(provider.finality_calls(), 2);
        assert_eq!(provider.block_calls(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_should_advance_to_new_checkpoint() -> eyre::Result<()> {
        let provider = beacon_provider();
        provider.push_finality(finality_checkpoints(11, NEXT_FINALIZED_ROOT, NEXT_JUSTIFIED_ROOT));
        let calls = HandlerCall::log();
        let handlers: Vec<Box<dyn EventHandler>> =
            vec![Box::new(RecordingHandler::new(0, calls.clone()))];
        let mut listener = Listener::new(provider, handlers, CONFIG);

        listener.step().await?;
        let outcome = listener.step().await?;

        assert_eq!(
            outcome,
            StepOutcome::Advanced { range: BlockRange::new(128, 132), root: NEXT_FINALIZED_ROOT }
        );
        assert_eq!(listener.latest_checkpoint(), NEXT_FINALIZED_ROOT);

        Ok(())
    }

    #[tokio::test]
    async fn test_should_not_mutate_state_on_finality_failure() -> eyre::Result<()> {
        let provider = Arc::new(MockBeaconProvider::default());
        provider.push_finality_error("Error");
        let calls = HandlerCall::log();
        let handlers: Vec<Box<dyn EventHandler>> =
            vec![Box::new(RecordingHandler::new(0, calls.clone()))];
        let mut listener = Listener::new(provider.clone(), handlers, CONFIG);

        let res = listener.step().await;

        assert!(matches!(res, Err(ListenerError::Finality(_))));
        assert_eq!(listener.latest_checkpoint(), B256::ZERO);
        assert_eq!(provider.block_calls(), 0);
        assert!(calls.lock().is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_should_retry_checkpoint_after_block_resolution_failure() -> eyre::Result<()> {
        let provider = Arc::new(MockBeaconProvider::default());
        provider.push_finality(finality_checkpoints(10, FINALIZED_ROOT, JUSTIFIED_ROOT));
        let calls = HandlerCall::log();
        let handlers: Vec<Box<dyn EventHandler>> =
            vec![Box::new(RecordingHandler::new(0, calls.clone()))];
        let mut listener = Listener::new(provider.clone(), handlers, CONFIG);

        let res = listener.step().await;
        assert!(matches!(res, Err(ListenerError::JustifiedBlock { root, .. }) if root == JUSTIFIED_ROOT));
        assert!(calls.lock().is_empty());

        provider.insert_block(JUSTIFIED_ROOT, beacon_block(100));
        let outcome = listener.step().await?;

        assert!(matches!(outcome, StepOutcome::Advanced { .. }));
        assert_eq!(calls.lock().len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn test_should_fail_on_missing_execution_payload() -> eyre::Result<()> {
        let provider = Arc::new(MockBeaconProvider::default());
        provider
            .push_finality(finality_checkpoints(10, FINALIZED_ROOT, JUSTIFIED_ROOT))
            .insert_block(JUSTIFIED_ROOT, Default::default());
        let mut listener = Listener::new(provider, vec![], CONFIG);

        let res = listener.step().await;

        assert!(matches!(res, Err(ListenerError::MissingExecutionPayload(root)) if root == JUSTIFIED_ROOT));
        assert_eq!(listener.latest_checkpoint(), B256::ZERO);

        Ok(())
    }

    #[tokio::test]
    async fn test_should_not_advance_on_handler_failure() -> eyre::Result<()> {
        let provider = beacon_provider();
        let calls = HandlerCall::log();
        let failing = FailingHandler::new(1);
        let handlers: Vec<Box<dyn EventHandler>> = vec![
            Box::new(RecordingHandler::new(0, calls.clone())),
            Box::new(failing.clone()),
            Box::new(RecordingHandler::new(2, calls.clone())),
        ];
        let mut listener = Listener::new(provider, handlers, CONFIG);

        let res = listener.step().await;
        assert!(matches!(res, Err(ListenerError::Handler { index: 1, .. })));
        assert!(res.is_err_and(|err| err.is_handler_error()));
        assert_eq!(listener.latest_checkpoint(), B256::ZERO);
        assert_eq!(calls.lock().iter().map(|call| call.handler).collect::<Vec<_>>(), vec![0]);

        // the same range is handed again to every handler once the failing one recovers.
        failing.recover();
        let outcome = listener.step().await?;

        let range = BlockRange::new(96, 100);
        assert_eq!(outcome, StepOutcome::Advanced { range, root: FINALIZED_ROOT });
        assert_eq!(failing.calls(), 2);
        assert_eq!(
            *calls.lock(),
            vec![
                HandlerCall { handler: 0, range },
                HandlerCall { handler: 0, range },
                HandlerCall { handler: 2, range }
            ]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_should_store_finalized_epoch() -> eyre::Result<()> {
        let provider = beacon_provider();
        let store = Arc::new(InMemoryBlockStore::default());
        let mut listener = Listener::new(provider, vec![], CONFIG).with_block_store(store.clone());

        listener.step().await?;

        assert_eq!(store.latest_epoch(CONFIG.domain_id), Some(10));

        Ok(())
    }

    #[tokio::test]
    async fn test_should_advance_when_block_store_fails() -> eyre::Result<()> {
        let provider = beacon_provider();
        let store = Arc::new(FailingBlockStore::default());
        let mut listener = Listener::new(provider, vec![], CONFIG).with_block_store(store.clone());

        let outcome = listener.step().await?;

        assert!(matches!(outcome, StepOutcome::Advanced { .. }));
        assert_eq!(store.calls(), 1);
        assert_eq!(listener.latest_checkpoint(), FINALIZED_ROOT);

        Ok(())
    }

    #[tokio::test]
    async fn test_should_exit_run_when_cancelled() -> eyre::Result<()> {
        let provider = beacon_provider();
        let shutdown = CancellationToken::new();
        shutdown.cancel();
        let listener = Listener::new(provider.clone(), vec![], CONFIG);

        tokio::time::timeout(Duration::from_secs(1), listener.run(shutdown, 10)).await?;

        assert_eq!(provider.finality_calls(), 0);

        Ok(())
    }

    #[tokio::test]
    async fn test_should_keep_running_after_failures() -> eyre::Result<()> {
        let provider = Arc::new(MockBeaconProvider::default());
        provider
            .push_finality_error("Error")
            .push_finality(finality_checkpoints(10, FINALIZED_ROOT, JUSTIFIED_ROOT))
            .insert_block(JUSTIFIED_ROOT, beacon_block(100));
        let calls = HandlerCall::log();
        let handlers: Vec<Box<dyn EventHandler>> =
            vec![Box::new(RecordingHandler::new(0, calls.clone()))];
        let listener = Listener::new(provider.clone(), handlers, CONFIG);
        let shutdown = CancellationToken::new();
        let handle = tokio::spawn(listener.run(shutdown.clone(), 10));

        tokio::time::timeout(Duration::from_secs(5), async {
            while provider.finality_calls() < 4 {
                tokio::time::sleep(Duration::from_millis(1)).await;
            }
        })
        .await?;
        shutdown.cancel();
        tokio::time::timeout(Duration::from_secs(5), handle).await??;

        assert_eq!(calls.lock().len(), 1);

        Ok(())
    }
}
