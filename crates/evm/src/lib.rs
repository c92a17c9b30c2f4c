//! A library containing the bridge contract interface of EVM chains.

pub mod abi;

mod constants;
pub use constants::*;
