use crate::DomainId;
use alloy_primitives::{Address, Bytes, B256};

/// A deposit decoded from a bridge contract log.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositRecord {
    /// The domain the deposit should be bridged to.
    pub destination_domain: DomainId,
    /// The nonce of the deposit on the source domain.
    pub deposit_nonce: u64,
    /// The identifier of the bridged resource.
    pub resource_id: B256,
    /// The address which emitted the deposit.
    pub sender: Address,
    /// The handler specific deposit data.
    pub data: Bytes,
}
