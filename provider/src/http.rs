//! Wallet provider reached over HTTP JSON-RPC.
//!
//! Suits desktop wallets and signers that expose a local JSON-RPC endpoint and
//! sign `eth_sendTransaction` requests themselves. HTTP cannot push events, so
//! [`WalletProvider::subscribe`] always returns `None`.

use std::time::Duration;

use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::client::RpcClient;
use async_trait::async_trait;
use elect_types::{Address, ChainId};
use url::Url;

use crate::{EventReceiver, ProviderError, WalletProvider};

/// JSON-RPC client for one wallet endpoint.
pub struct HttpWalletProvider {
    name: String,
    selected: Option<Address>,
    rpc: DynProvider,
}

impl HttpWalletProvider {
    /// Open a provider and check that the wallet exposes an account.
    ///
    /// `selected` pins the active account; otherwise the wallet's first
    /// account is used by the session. `poll_interval` paces receipt polling
    /// for transactions sent through this provider.
    pub async fn connect(
        name: impl Into<String>,
        url: &str,
        selected: Option<Address>,
        poll_interval: Duration,
    ) -> Result<Self, ProviderError> {
        let name = name.into();
        let endpoint: Url = url.parse()?;
        let client = RpcClient::new_http(endpoint).with_poll_interval(poll_interval);
        // The wallet fills nonce and gas when it signs.
        let rpc = ProviderBuilder::new()
            .disable_recommended_fillers()
            .connect_client(client)
            .erased();

        let accounts = rpc.get_accounts().await?;
        if accounts.is_empty() && selected.is_none() {
            return Err(ProviderError::NoAccounts);
        }

        tracing::debug!(
            provider = %name,
            url,
            accounts = accounts.len(),
            "wallet endpoint opened"
        );
        Ok(Self { name, selected, rpc })
    }
}

#[async_trait]
impl WalletProvider for HttpWalletProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn selected_address(&self) -> Option<Address> {
        self.selected
    }

    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        Ok(self.rpc.get_accounts().await?)
    }

    async fn chain_id(&self) -> Result<ChainId, ProviderError> {
        Ok(ChainId::new(self.rpc.get_chain_id().await?))
    }

    fn rpc(&self) -> Option<DynProvider> {
        Some(self.rpc.clone())
    }

    fn subscribe(&self) -> Option<EventReceiver> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn unreachable_endpoint_is_a_transport_error() {
        // Port 9 (discard) is not expected to serve HTTP.
        let result = HttpWalletProvider::connect(
            "local",
            "http://127.0.0.1:9",
            None,
            Duration::from_millis(500),
        )
        .await;
        assert!(matches!(result, Err(ProviderError::Transport(_))));
    }

    #[tokio::test]
    async fn malformed_endpoint_is_rejected_before_connecting() {
        let result =
            HttpWalletProvider::connect("local", "not a url", None, Duration::from_secs(1)).await;
        assert!(matches!(result, Err(ProviderError::InvalidUrl(_))));
    }
}
