/// The signature of the deposit event emitted by the bridge contract.
pub const DEPOSIT_SIGNATURE: &str = "Deposit(uint8,uint8,bytes32,uint64,address,bytes)";
