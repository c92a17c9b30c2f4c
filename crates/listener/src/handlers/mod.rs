//! Event handlers invoked by the listener for each finalized block range.

mod deposit;
pub use deposit::DepositEventHandler;

mod rotate;
pub use rotate::RotateEventHandler;

use crate::HandlerError;
use spectre_primitives::BlockRange;
use std::fmt::Debug;

/// An event handler performs chain specific work for a finalized block range, writing the
/// resulting messages to the outbound channel.
///
/// The listener retries a range verbatim when any handler fails, so implementations must be safe
/// to call repeatedly with the same range.
#[async_trait::async_trait]
pub trait EventHandler: Debug + Send {
    /// Handles the events of the provided block range.
    async fn handle_events(&mut self, range: BlockRange) -> Result<(), HandlerError>;
}
