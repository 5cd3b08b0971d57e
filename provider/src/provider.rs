//! The raw wallet provider seam.

use alloy::providers::DynProvider;
use async_trait::async_trait;
use elect_types::{Address, ChainId, ProviderEvent};
use tokio::sync::mpsc;

use crate::ProviderError;

/// Receiving half of a provider's lifecycle event stream.
pub type EventReceiver = mpsc::UnboundedReceiver<ProviderEvent>;

/// A connected wallet provider.
///
/// The wallet signs any transaction sent through [`WalletProvider::rpc`].
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Human-readable provider name, e.g. the option the user picked.
    fn name(&self) -> &str;

    /// The account the wallet explicitly marks as selected, if any.
    fn selected_address(&self) -> Option<Address>;

    /// Accounts the wallet currently exposes, in the wallet's order.
    async fn accounts(&self) -> Result<Vec<Address>, ProviderError>;

    /// The chain the wallet is attached to.
    async fn chain_id(&self) -> Result<ChainId, ProviderError>;

    /// JSON-RPC handle for contract calls, `None` for wallets that only
    /// report accounts and network.
    fn rpc(&self) -> Option<DynProvider>;

    /// Subscribe to lifecycle events.
    ///
    /// Returns `None` when the provider cannot push events; the session then
    /// stays connected but does not observe external account or network
    /// switches until the user reconnects.
    fn subscribe(&self) -> Option<EventReceiver>;
}
