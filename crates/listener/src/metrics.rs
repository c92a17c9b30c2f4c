use metrics::{Counter, Gauge};
use metrics_derive::Metrics;

/// The metrics for the [`super::Listener`].
#[derive(Metrics)]
#[metrics(scope = "listener")]
pub struct ListenerMetrics {
    /// A counter on the loop iterations.
    pub ticks: Counter,
    /// A counter on the iterations without new finality.
    pub idle_ticks: Counter,
    /// A counter on the finality checkpoints fully handled.
    pub advanced_checkpoints: Counter,
    /// A counter on the iterations aborted by a handler failure.
    pub handler_failures: Counter,
    /// A counter on the iterations aborted by a Beacon provider failure.
    pub upstream_failures: Counter,
    /// The end block of the last handled block range.
    pub last_end_block: Gauge,
}

/// The metrics for the [`super::DepositEventHandler`].
#[derive(Metrics)]
#[metrics(scope = "deposit_handler")]
pub struct DepositHandlerMetrics {
    /// A counter on the deposit messages emitted.
    pub deposits: Counter,
    /// A counter on the logs which failed to decode.
    pub malformed_logs: Counter,
}

/// The metrics for the [`super::RotateEventHandler`].
#[derive(Metrics)]
#[metrics(scope = "rotate_handler")]
pub struct RotateHandlerMetrics {
    /// A counter on the sync committee rotations.
    pub rotations: Counter,
    /// A counter on the rotate messages emitted.
    pub rotate_messages: Counter,
}
