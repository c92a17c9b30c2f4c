use super::EventHandler;
use crate::{metrics::RotateHandlerMetrics, HandlerError};

use spectre_primitives::{BlockRange, DomainId, MessageBatch, OutboundMessage, RotateData};
use spectre_providers::{Prover, SyncCommittee, SyncCommitteeFetcher, FINALIZED_STATE};
use std::fmt::{Debug, Formatter};
use tokio::sync::mpsc;

/// Watches the finalized sync committee and sends a rotate message to every destination domain
/// when it changes.
pub struct RotateEventHandler<S, P> {
    /// The domain of the monitored chain.
    domain_id: DomainId,
    /// The domains notified of a rotation, in order.
    domains: Vec<DomainId>,
    /// The sender part of the outbound message channel.
    sender: mpsc::Sender<MessageBatch>,
    /// The sync committee fetcher.
    sync_committee_fetcher: S,
    /// The light client prover.
    prover: P,
    /// The last sync committee rotated to.
    current_sync_committee: Option<SyncCommittee>,
    /// The metrics for the handler.
    metrics: RotateHandlerMetrics,
}

impl<S: Debug, P: Debug> Debug for RotateEventHandler<S, P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotateEventHandler")
            .field("domain_id", &self.domain_id)
            .field("domains", &self.domains)
            .field("sync_committee_fetcher", &self.sync_committee_fetcher)
            .field("prover", &self.prover)
            .finish_non_exhaustive()
    }
}

impl<S, P> RotateEventHandler<S, P>
where
    S: SyncCommitteeFetcher,
    P: Prover,
{
    /// Returns a new [`RotateEventHandler`].
    pub fn new(
        domain_id: DomainId,
        domains: Vec<DomainId>,
        sender: mpsc::Sender<MessageBatch>,
        sync_committee_fetcher: S,
        prover: P,
    ) -> Self {
        Self {
            domain_id,
            domains,
            sender,
            sync_committee_fetcher,
            prover,
            current_sync_committee: None,
            metrics: RotateHandlerMetrics::default(),
        }
    }

    /// Returns the last sync committee the handler rotated to.
    pub const fn current_sync_committee(&self) -> Option<&SyncCommittee> {
        self.current_sync_committee.as_ref()
    }
}

#[async_trait::async_trait]
impl<S, P> EventHandler for RotateEventHandler<S, P>
where
    S: SyncCommitteeFetcher + Debug,
    P: Prover + Debug,
{
    #[tracing::instrument(target = "spectre::handlers", skip_all, fields(%range))]
    async fn handle_events(&mut self, range: BlockRange) -> Result<(), HandlerError> {
        let sync_committee = self.sync_committee_fetcher.sync_committee(FINALIZED_STATE).await?;
        if self.current_sync_committee.as_ref() == Some(&sync_committee) {
            return Ok(());
        }

        tracing::info!(target: "spectre::handlers", domain_id = self.domain_id, block_number = range.end, "rotating committee");

        let step_proof = self.prover.step_proof(range.end).await?;
        let rotate_proof = self.prover.rotate_proof(range.end).await?;
        let data = RotateData { block_number: range.end, step_proof, rotate_proof };

        for &destination in &self.domains {
            tracing::debug!(target: "spectre::handlers", destination, "sending rotate message");
            self.sender
                .send(vec![OutboundMessage::rotate(self.domain_id, destination, data.clone())])
                .await?;
            self.metrics.rotate_messages.increment(1);
        }

        self.metrics.rotations.increment(1);
        self.current_sync_committee = Some(sync_committee);

        Ok(())
    }
}
