//! The contract call surface the session depends on.

use std::sync::Arc;

use alloy::json_abi::JsonAbi;
use async_trait::async_trait;
use elect_provider::Library;
use elect_types::{Address, Party, Receipt, StateResult, TxHash};

use crate::GatewayError;

/// A write accepted into the pending pool but not yet mined.
#[async_trait]
pub trait PendingTransaction: Send + Sync {
    fn hash(&self) -> TxHash;

    /// Error the node attached to the transaction itself, if any.
    fn error(&self) -> Option<String>;

    /// Suspend until the transaction is mined. Unbounded; callers apply their
    /// own timeout.
    async fn wait(&self) -> Result<Receipt, GatewayError>;
}

/// Handle on the deployed election contract, bound to one signer.
///
/// Reads have no side effects and may run concurrently. Writes return once
/// the transaction is pending; only a receipt with status 1 means the
/// contract applied the change.
#[async_trait]
pub trait ElectionContract: Send + Sync {
    async fn current_leader_id(&self) -> Result<u64, GatewayError>;

    async fn seats_for(&self, party: Party) -> Result<u64, GatewayError>;

    async fn has_ended(&self) -> Result<bool, GatewayError>;

    async fn submit_state_result(
        &self,
        result: &StateResult,
    ) -> Result<Box<dyn PendingTransaction>, GatewayError>;

    async fn end_election(&self) -> Result<Box<dyn PendingTransaction>, GatewayError>;
}

/// Binds a contract address and interface to a library and signing account.
pub trait ContractGateway: Send + Sync {
    /// Pure construction; performs no network I/O.
    fn bind(
        &self,
        address: Address,
        abi: &JsonAbi,
        library: &Library,
        account: Address,
    ) -> Result<Arc<dyn ElectionContract>, GatewayError>;
}
