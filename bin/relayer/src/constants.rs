/// The max retries for the execution provider.
pub const PROVIDER_MAX_RETRIES: u32 = 10;

/// The initial backoff for the execution provider.
pub const PROVIDER_INITIAL_BACKOFF: u64 = 100;

/// The default provider compute units per second.
pub const PROVIDER_COMPUTE_UNITS_PER_SECOND: u64 = 50;

/// The default wait in seconds between two finality polls, one Beacon slot.
pub const DEFAULT_RETRY_INTERVAL: u64 = 12;

/// The default size of the block range handed to the handlers, one Beacon epoch.
pub const DEFAULT_BLOCK_INTERVAL: u64 = 32;

/// The default capacity of the outbound message channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1;

/// The default log filter.
pub const DEFAULT_LOG_FILTER: &str = "info";
