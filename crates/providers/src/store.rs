use crate::ProviderError;

use parking_lot::Mutex;
use spectre_primitives::DomainId;
use std::{collections::HashMap, fmt::Debug};

/// Implementers of the trait keep track of the epochs processed for each domain.
#[async_trait::async_trait]
#[auto_impl::auto_impl(&, Arc, Box)]
pub trait BlockStorer: Debug + Sync + Send {
    /// Records `epoch` as the latest processed epoch of `domain_id`.
    async fn store_block(&self, epoch: u64, domain_id: DomainId) -> Result<(), ProviderError>;
}

/// A [`BlockStorer`] keeping the latest processed epochs in memory.
#[derive(Debug, Default)]
pub struct InMemoryBlockStore {
    epochs: Mutex<HashMap<DomainId, u64>>,
}

impl InMemoryBlockStore {
    /// Returns the latest epoch stored for the domain, if any.
    pub fn latest_epoch(&self, domain_id: DomainId) -> Option<u64> {
        self.epochs.lock().get(&domain_id).copied()
    }
}

#[async_trait::async_trait]
impl BlockStorer for InMemoryBlockStore {
    async fn store_block(&self, epoch: u64, domain_id: DomainId) -> Result<(), ProviderError> {
        self.epochs.lock().insert(domain_id, epoch);
        Ok(())
    }
}
