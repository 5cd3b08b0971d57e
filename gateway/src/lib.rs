//! Typed call surface for the deployed election contract.
//!
//! The [`USElection`] binding is generated from the bundled Solidity ABI JSON
//! with `alloy::sol!`. [`ContractGateway::bind`] checks a configured
//! [`JsonAbi`] against that binding and produces an [`ElectionContract`]
//! handle scoped to one address and signer. Reads return decoded values;
//! writes return a [`PendingTransaction`] whose `wait` resolves to the mined
//! [`Receipt`](elect_types::Receipt).

pub mod abi;
pub mod contract;
pub mod error;
pub mod rpc;

pub use abi::{ensure_election_interface, us_election_abi, USElection, ELECTION_FUNCTIONS};
pub use alloy::json_abi::JsonAbi;
pub use contract::{ContractGateway, ElectionContract, PendingTransaction};
pub use error::GatewayError;
pub use rpc::{JsonRpcElectionContract, JsonRpcGateway, JsonRpcPendingTransaction};
