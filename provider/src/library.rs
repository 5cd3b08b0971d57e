//! Network and account queries over a wallet provider.

use std::sync::Arc;

use alloy::providers::DynProvider;
use elect_types::{chain_data, Address, ChainId};

use crate::{ProviderError, WalletProvider};

/// The network a provider is currently attached to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Network {
    pub chain_id: ChainId,
    /// Registry network name, `"unknown"` for chains not in the registry.
    pub name: &'static str,
}

/// Read/write handle built from a raw provider.
///
/// Cheap to clone; every clone talks to the same provider.
#[derive(Clone)]
pub struct Library {
    wallet: Arc<dyn WalletProvider>,
}

impl Library {
    pub fn new(wallet: Arc<dyn WalletProvider>) -> Self {
        Self { wallet }
    }

    /// Query the active network.
    pub async fn network(&self) -> Result<Network, ProviderError> {
        let chain_id = self.wallet.chain_id().await?;
        let name = chain_data(chain_id).map(|c| c.network).unwrap_or("unknown");
        Ok(Network { chain_id, name })
    }

    /// Accounts the wallet currently exposes.
    pub async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        self.wallet.accounts().await
    }

    /// JSON-RPC handle contract bindings are built on.
    pub fn rpc(&self) -> Result<DynProvider, ProviderError> {
        self.wallet.rpc().ok_or_else(|| {
            ProviderError::Unsupported(format!(
                "provider {:?} exposes no JSON-RPC endpoint",
                self.wallet.name()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EventReceiver;
    use async_trait::async_trait;

    /// Reports a fixed chain and fails account queries.
    struct CannedProvider {
        chain: u64,
    }

    #[async_trait]
    impl WalletProvider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        fn selected_address(&self) -> Option<Address> {
            None
        }

        async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
            Err(ProviderError::Rpc {
                code: -32601,
                message: "method eth_accounts not found".into(),
            })
        }

        async fn chain_id(&self) -> Result<ChainId, ProviderError> {
            Ok(ChainId::new(self.chain))
        }

        fn rpc(&self) -> Option<DynProvider> {
            None
        }

        fn subscribe(&self) -> Option<EventReceiver> {
            None
        }
    }

    fn library(chain: u64) -> Library {
        Library::new(Arc::new(CannedProvider { chain }))
    }

    #[tokio::test]
    async fn network_resolves_registry_name() {
        let network = library(42).network().await.unwrap();
        assert_eq!(network.chain_id, ChainId::new(42));
        assert_eq!(network.name, "kovan");
    }

    #[tokio::test]
    async fn unknown_chain_is_named_unknown() {
        let network = library(0x7a69a).network().await.unwrap();
        assert_eq!(network.name, "unknown");
    }

    #[tokio::test]
    async fn rpc_errors_propagate() {
        let err = library(1).accounts().await.unwrap_err();
        assert!(matches!(err, ProviderError::Rpc { code: -32601, .. }));
    }

    #[test]
    fn missing_rpc_endpoint_is_unsupported() {
        assert!(matches!(library(1).rpc(), Err(ProviderError::Unsupported(_))));
    }
}
