//! Solidity bindings of the bridge contract.

pub mod logs;
