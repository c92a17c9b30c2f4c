use crate::ProviderError;

use alloy_primitives::Address;
use alloy_provider::Provider;
use alloy_rpc_types_eth::{Filter, Log};

/// Implementers of the trait can provide the logs emitted by a contract in a block range.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait EventFetcher: Sync + Send {
    /// Returns the logs emitted by `address` matching the event `signature` between `from_block`
    /// and `to_block`, both inclusive.
    async fn fetch_event_logs(
        &self,
        address: Address,
        signature: &str,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<Log>, ProviderError>;
}

/// The fetcher uses a [`Provider`] internally to implement the [`EventFetcher`] trait.
#[derive(Default, Clone, Debug)]
pub struct AlloyEventFetcher<P> {
    /// An alloy provider.
    provider: P,
}

impl<P: Provider> AlloyEventFetcher<P> {
    /// Returns a new instance of a [`AlloyEventFetcher`].
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }
}

#[async_trait::async_trait]
impl<P: Provider> EventFetcher for AlloyEventFetcher<P> {
    async fn fetch_event_logs(
        &self,
        address: Address,
        signature: &str,
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<Log>, ProviderError> {
        let filter =
            Filter::new().address(address).event(signature).from_block(from_block).to_block(to_block);
        tracing::trace!(target: "spectre::providers", ?filter, "fetching logs");

        Ok(self.provider.get_logs(&filter).await?)
    }
}
