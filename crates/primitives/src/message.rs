use crate::{DepositRecord, RotateData};

/// The identifier of a chain in the bridge routing scheme.
pub type DomainId = u8;

/// An ordered batch of messages written to the outbound channel at once.
pub type MessageBatch = Vec<OutboundMessage>;

/// The type tag of an [`OutboundMessage`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum MessageKind {
    /// A deposit to relay to the destination domain.
    #[display("deposit")]
    Deposit,
    /// A sync committee rotation for the destination light client.
    #[display("rotate")]
    Rotate,
}

/// The type specific content of an [`OutboundMessage`].
#[derive(Debug, Clone, PartialEq, Eq, derive_more::From, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum MessagePayload {
    /// A decoded deposit.
    Deposit(DepositRecord),
    /// Step and rotation proofs.
    Rotate(RotateData),
}

/// A message bound for the relay pipeline.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OutboundMessage {
    /// The domain the message originates from.
    pub source: DomainId,
    /// The domain the message should be delivered to.
    pub destination: DomainId,
    /// The message payload.
    pub payload: MessagePayload,
}

impl OutboundMessage {
    /// Returns a deposit message from `source` to the destination of the deposit.
    pub fn deposit(source: DomainId, deposit: DepositRecord) -> Self {
        Self { source, destination: deposit.destination_domain, payload: deposit.into() }
    }

    /// Returns a rotate message from `source` to `destination`.
    pub fn rotate(source: DomainId, destination: DomainId, data: RotateData) -> Self {
        Self { source, destination, payload: data.into() }
    }

    /// Returns the type tag of the message.
    pub const fn kind(&self) -> MessageKind {
        match self.payload {
            MessagePayload::Deposit(_) => MessageKind::Deposit,
            MessagePayload::Rotate(_) => MessageKind::Rotate,
        }
    }
}
