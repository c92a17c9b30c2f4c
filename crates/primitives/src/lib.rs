//! Primitive types for the Spectre relayer.

pub use block::BlockRange;
mod block;

pub use deposit::DepositRecord;
mod deposit;

pub use message::{DomainId, MessageBatch, MessageKind, MessagePayload, OutboundMessage};
mod message;

pub use proof::{Proof, RotateData};
mod proof;
