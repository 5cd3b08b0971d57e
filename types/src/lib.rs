//! Fundamental types for the election client.
//!
//! This crate defines the value types shared across every other crate in the
//! workspace: chain identifiers and the static chain registry, election
//! parties and leaders, transaction receipts, and the lifecycle events a
//! wallet provider emits. Accounts and transaction hashes are the
//! `alloy-primitives` types, re-exported here.

pub mod chain;
pub mod election;
pub mod error;
pub mod event;
pub mod receipt;

pub use alloy_primitives::{Address, TxHash};
pub use chain::{chain_data, explorer_tx_url, network_for, ChainData, ChainId};
pub use election::{Leader, Party, StateResult};
pub use error::TypesError;
pub use event::ProviderEvent;
pub use receipt::{Receipt, TxStatus};
