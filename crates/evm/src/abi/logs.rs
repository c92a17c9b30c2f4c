use alloy_primitives::{Address, LogData};
use alloy_sol_types::{sol, SolEvent};
use spectre_primitives::DepositRecord;

sol! {
    // *********************EVENTS*********************
    #[allow(missing_docs)]
    event Deposit(
        uint8 destinationDomainID,
        uint8 securityModel,
        bytes32 resourceID,
        uint64 depositNonce,
        address indexed user,
        bytes data
    );
}

/// An error occurring when decoding a deposit log.
#[derive(Debug, thiserror::Error)]
pub enum DepositDecodeError {
    /// The log does not carry the indexed sender topic.
    #[error("missing sender topic, log has {0} topics")]
    MissingSenderTopic(usize),
    /// The data section of the log is not a valid deposit encoding.
    #[error("invalid deposit data: {0}")]
    InvalidData(#[from] alloy_sol_types::Error),
}

/// Decodes the provided log data into a [`DepositRecord`].
///
/// The event signature topic is not checked, the record is built from the data section and the
/// indexed sender only.
pub fn decode_deposit(log: &LogData) -> Result<DepositRecord, DepositDecodeError> {
    let (destination_domain, _security_model, resource_id, deposit_nonce, data) =
        Deposit::abi_decode_data(&log.data)?;

    let sender = log
        .topics()
        .get(1)
        .map(|topic| Address::from_word(*topic))
        .ok_or(DepositDecodeError::MissingSenderTopic(log.topics().len()))?;

    Ok(DepositRecord { destination_domain, deposit_nonce, resource_id, sender, data })
}
