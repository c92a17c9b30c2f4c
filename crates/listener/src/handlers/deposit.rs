use super::EventHandler;
use crate::{metrics::DepositHandlerMetrics, HandlerError};

use alloy_primitives::Address;
use spectre_evm::{abi::logs::decode_deposit, DEPOSIT_SIGNATURE};
use spectre_primitives::{BlockRange, DomainId, MessageBatch, OutboundMessage};
use spectre_providers::EventFetcher;
use std::fmt::{Debug, Formatter};
use tokio::sync::mpsc;

/// Fetches the deposits emitted by the bridge contract and emits one deposit message per decoded
/// deposit.
pub struct DepositEventHandler<F> {
    /// The domain of the chain the deposits are fetched from.
    domain_id: DomainId,
    /// The sender part of the outbound message channel.
    sender: mpsc::Sender<MessageBatch>,
    /// The event log fetcher.
    event_fetcher: F,
    /// The address of the bridge contract.
    bridge_address: Address,
    /// The metrics for the handler.
    metrics: DepositHandlerMetrics,
}

impl<F: Debug> Debug for DepositEventHandler<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DepositEventHandler")
            .field("domain_id", &self.domain_id)
            .field("event_fetcher", &self.event_fetcher)
            .field("bridge_address", &self.bridge_address)
            .finish_non_exhaustive()
    }
}

impl<F: EventFetcher> DepositEventHandler<F> {
    /// Returns a new [`DepositEventHandler`] fetching deposits of the bridge contract at
    /// `bridge_address` on the `domain_id` chain.
    pub fn new(
        sender: mpsc::Sender<MessageBatch>,
        event_fetcher: F,
        bridge_address: Address,
        domain_id: DomainId,
    ) -> Self {
        Self {
            domain_id,
            sender,
            event_fetcher,
            bridge_address,
            metrics: DepositHandlerMetrics::default(),
        }
    }
}

#[async_trait::async_trait]
impl<F: EventFetcher + Debug> EventHandler for DepositEventHandler<F> {
    #[tracing::instrument(target = "spectre::handlers", skip_all, fields(%range))]
    async fn handle_events(&mut self, range: BlockRange) -> Result<(), HandlerError> {
        let logs = self
            .event_fetcher
            .fetch_event_logs(self.bridge_address, DEPOSIT_SIGNATURE, range.start, range.end)
            .await?;

        let mut messages = MessageBatch::with_capacity(logs.len());
        for log in &logs {
            match decode_deposit(&log.inner.data) {
                Ok(deposit) => messages.push(OutboundMessage::deposit(self.domain_id, deposit)),
                Err(err) => {
                    tracing::trace!(target: "spectre::handlers", tx_hash = ?log.transaction_hash, log_index = ?log.log_index, %err, "skipping malformed deposit log");
                    self.metrics.malformed_logs.increment(1);
                }
            }
        }

        if messages.is_empty() {
            return Ok(());
        }

        tracing::debug!(target: "spectre::handlers", domain_id = self.domain_id, count = messages.len(), "sending deposit messages");
        self.metrics.deposits.increment(messages.len() as u64);
        self.sender.send(messages).await?;

        Ok(())
    }
}
