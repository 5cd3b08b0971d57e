//! Nullable infrastructure for deterministic testing.
//!
//! Every external collaborator of an election session (the wallet, the
//! wallet-selection step, the deployed contract) is abstracted behind a trait.
//! This crate provides in-memory implementations that:
//! - Return deterministic values
//! - Can be scripted and inspected programmatically
//! - Never touch the filesystem or network
//!
//! Usage: swap real implementations for nullables in tests.

pub mod connector;
pub mod contract;
pub mod wallet;

pub use connector::NullConnector;
pub use contract::{NullContract, NullGateway, NullPendingTransaction, ScriptedWrite};
pub use wallet::NullWallet;
