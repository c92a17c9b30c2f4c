use spectre_primitives::MessageBatch;
use tokio::sync::mpsc;

/// Drains the outbound message channel, logging every relayed message. Returns the amount of
/// messages once all senders are dropped.
pub async fn drain_messages(mut receiver: mpsc::Receiver<MessageBatch>) -> usize {
    let mut relayed = 0;
    while let Some(batch) = receiver.recv().await {
        tracing::debug!(target: "spectre::relayer", size = batch.len(), "received message batch");
        for message in batch {
            tracing::info!(
                target: "spectre::relayer",
                kind = %message.kind(),
                source = message.source,
                destination = message.destination,
                "relaying message"
            );
            relayed += 1;
        }
    }
    relayed
}
