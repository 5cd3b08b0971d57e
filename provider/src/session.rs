//! Lifecycle of a single wallet connection.

use std::sync::Arc;
use std::time::Duration;

use elect_types::{Address, ChainId, ProviderEvent};
use tokio::sync::mpsc::error::TryRecvError;

use crate::{EventReceiver, Library, ProviderConnector, ProviderError, WalletProvider};

/// What a successful [`ProviderSession::connect`] yields.
#[derive(Clone)]
pub struct Connection {
    pub library: Library,
    pub chain_id: ChainId,
    pub account: Address,
}

/// A state change the owner of the session must apply after a provider event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionUpdate {
    /// The wallet closed the session; tear everything down.
    Reset,
    /// Adopt this account. `None` when the wallet reports no accounts.
    Account(Option<Address>),
    /// The wallet moved to this chain.
    Chain(ChainId),
}

/// Owns at most one wallet connection.
pub struct ProviderSession {
    connector: Arc<dyn ProviderConnector>,
    connect_timeout: Duration,
    provider: Option<Arc<dyn WalletProvider>>,
    events: Option<EventReceiver>,
}

impl ProviderSession {
    pub fn new(connector: Arc<dyn ProviderConnector>, connect_timeout: Duration) -> Self {
        Self {
            connector,
            connect_timeout,
            provider: None,
            events: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.provider.is_some()
    }

    /// Whether an earlier session left a provider to reconnect to.
    pub fn has_cached_provider(&self) -> bool {
        self.connector.cached_provider().is_some()
    }

    /// Whether the connected provider pushes lifecycle events.
    pub fn has_event_stream(&self) -> bool {
        self.events.is_some()
    }

    /// Open a wallet connection.
    ///
    /// Nothing is stored unless every step succeeds, so a cancelled or failed
    /// attempt leaves the session disconnected and the cached provider as it
    /// was. The provider is remembered only after the connection is complete.
    pub async fn connect(&mut self) -> Result<Connection, ProviderError> {
        let provider = tokio::time::timeout(self.connect_timeout, self.connector.connect())
            .await
            .map_err(|_| ProviderError::Timeout(self.connect_timeout))??;

        let library = Library::new(Arc::clone(&provider));
        let network = library.network().await?;
        let account = match provider.selected_address() {
            Some(account) => account,
            None => library
                .accounts()
                .await?
                .first()
                .copied()
                .ok_or(ProviderError::NoAccounts)?,
        };

        self.subscribe(&provider);
        if let Err(e) = self.connector.remember(provider.name()) {
            tracing::warn!(error = %e, "failed to remember wallet provider");
        }
        self.provider = Some(provider);

        tracing::info!(
            account = %account,
            chain_id = %network.chain_id,
            network = network.name,
            "wallet connected"
        );
        Ok(Connection {
            library,
            chain_id: network.chain_id,
            account,
        })
    }

    /// Attach to the provider's lifecycle events. Returns `false` (and stays
    /// connected without event handling) when the provider cannot push them.
    pub fn subscribe(&mut self, provider: &Arc<dyn WalletProvider>) -> bool {
        self.events = provider.subscribe();
        if self.events.is_none() {
            tracing::debug!(provider = provider.name(), "provider does not emit lifecycle events");
        }
        self.events.is_some()
    }

    /// Next queued event without waiting.
    pub fn try_next_event(&mut self) -> Option<ProviderEvent> {
        let events = self.events.as_mut()?;
        match events.try_recv() {
            Ok(event) => Some(event),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.events = None;
                None
            }
        }
    }

    /// Wait for the next event. Never resolves while no event stream is
    /// attached.
    pub async fn next_event(&mut self) -> ProviderEvent {
        loop {
            match self.events.as_mut() {
                Some(events) => match events.recv().await {
                    Some(event) => return event,
                    None => self.events = None,
                },
                None => std::future::pending::<()>().await,
            }
        }
    }

    /// Translate a provider event into the update the owner must apply.
    ///
    /// Events that arrive while disconnected are stale and yield `None`.
    pub async fn handle_event(
        &mut self,
        event: ProviderEvent,
    ) -> Result<Option<SessionUpdate>, ProviderError> {
        let Some(provider) = self.provider.clone() else {
            tracing::debug!(?event, "ignoring provider event while disconnected");
            return Ok(None);
        };

        let update = match event {
            ProviderEvent::Close => SessionUpdate::Reset,
            ProviderEvent::AccountsChanged(accounts) => {
                SessionUpdate::Account(accounts.first().copied())
            }
            ProviderEvent::NetworkChanged(announced) => {
                let library = Library::new(provider);
                let network = library.network().await?;
                if network.chain_id != announced {
                    tracing::debug!(%announced, actual = %network.chain_id, "network event disagrees with provider");
                }
                SessionUpdate::Chain(network.chain_id)
            }
        };
        Ok(Some(update))
    }

    /// Drop the connection but keep the cached provider, so a later run can
    /// still resume it. Safe to call when never connected.
    pub fn close(&mut self) {
        if self.provider.take().is_some() {
            tracing::info!("wallet connection closed");
        }
        self.events = None;
    }

    /// Drop the connection and forget the cached provider. Safe to call when
    /// never connected.
    pub fn disconnect(&mut self) {
        if let Err(e) = self.connector.clear_cached_provider() {
            tracing::warn!(error = %e, "failed to clear cached provider");
        }
        self.close();
    }
}
