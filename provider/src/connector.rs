//! Wallet selection: choosing a provider and remembering the choice.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use elect_types::Address;
use serde::{Deserialize, Serialize};

use crate::{CachedProviderStore, HttpWalletProvider, ProviderError, WalletProvider};

/// Produces a connected [`WalletProvider`], the way a wallet-selection modal
/// would.
#[async_trait]
pub trait ProviderConnector: Send + Sync {
    /// Name of the provider remembered from an earlier session.
    fn cached_provider(&self) -> Option<String>;

    /// Select and open a provider. May wait on user interaction for as long as
    /// the wallet takes; callers bound it.
    async fn connect(&self) -> Result<Arc<dyn WalletProvider>, ProviderError>;

    /// Remember `name` for the next run. Called only once a connection is
    /// fully established.
    fn remember(&self, name: &str) -> Result<(), ProviderError>;

    /// Forget the remembered provider.
    fn clear_cached_provider(&self) -> Result<(), ProviderError>;
}

/// One wallet the user can pick.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderOption {
    pub name: String,
    /// JSON-RPC endpoint of the wallet.
    pub url: String,
    /// Pin this account instead of the wallet's first one.
    #[serde(default)]
    pub account: Option<Address>,
}

/// Connector over a fixed list of HTTP wallet endpoints.
pub struct WalletConnector {
    network: String,
    options: Vec<ProviderOption>,
    preferred: Option<String>,
    cache: Option<CachedProviderStore>,
    poll_interval: Duration,
}

impl WalletConnector {
    pub fn new(network: impl Into<String>, options: Vec<ProviderOption>) -> Self {
        Self {
            network: network.into(),
            options,
            preferred: None,
            cache: None,
            poll_interval: Duration::from_secs(4),
        }
    }

    /// Connect to this option rather than the cached or default one.
    pub fn with_preferred(mut self, name: Option<String>) -> Self {
        self.preferred = name;
        self
    }

    /// Remember the chosen provider in `store`.
    pub fn with_cache(mut self, store: CachedProviderStore) -> Self {
        self.cache = Some(store);
        self
    }

    /// How often pending transactions are polled for a receipt.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Resolve which option to open: explicit choice, then cached, then the
    /// first configured option.
    pub fn choose(&self) -> Result<&ProviderOption, ProviderError> {
        let wanted = self.preferred.clone().or_else(|| self.cached_provider());
        match wanted {
            Some(name) => self
                .options
                .iter()
                .find(|option| option.name == name)
                .ok_or_else(|| ProviderError::Cancelled(format!("no provider named {name:?}"))),
            None => self
                .options
                .first()
                .ok_or_else(|| ProviderError::Cancelled("no wallet providers configured".into())),
        }
    }
}

#[async_trait]
impl ProviderConnector for WalletConnector {
    fn cached_provider(&self) -> Option<String> {
        let store = self.cache.as_ref()?;
        match store.load() {
            Ok(name) => name,
            Err(e) => {
                tracing::warn!(error = %e, "ignoring unreadable provider cache");
                None
            }
        }
    }

    async fn connect(&self) -> Result<Arc<dyn WalletProvider>, ProviderError> {
        let option = self.choose()?;
        tracing::info!(provider = %option.name, network = %self.network, "connecting wallet");

        let provider = HttpWalletProvider::connect(
            option.name.clone(),
            &option.url,
            option.account,
            self.poll_interval,
        )
        .await?;
        Ok(Arc::new(provider))
    }

    fn remember(&self, name: &str) -> Result<(), ProviderError> {
        match &self.cache {
            Some(store) => store.save(name),
            None => Ok(()),
        }
    }

    fn clear_cached_provider(&self) -> Result<(), ProviderError> {
        match &self.cache {
            Some(store) => store.clear(),
            None => Ok(()),
        }
    }
}
