//! Nullable wallet: answers chain queries and lets tests push events.

use std::sync::Mutex;

use alloy::providers::DynProvider;
use async_trait::async_trait;
use elect_provider::{EventReceiver, ProviderError, WalletProvider};
use elect_types::{Address, ChainId, ProviderEvent};
use tokio::sync::mpsc;

/// A wallet that never leaves the process.
pub struct NullWallet {
    chain_id: Mutex<ChainId>,
    selected: Option<Address>,
    accounts: Vec<Address>,
    supports_events: bool,
    sender: Mutex<Option<mpsc::UnboundedSender<ProviderEvent>>>,
}

impl NullWallet {
    pub fn new(chain_id: ChainId, accounts: Vec<Address>) -> Self {
        Self {
            chain_id: Mutex::new(chain_id),
            selected: None,
            accounts,
            supports_events: true,
            sender: Mutex::new(None),
        }
    }

    /// Mark one account as explicitly selected.
    pub fn with_selected(mut self, address: Address) -> Self {
        self.selected = Some(address);
        self
    }

    /// Behave like a provider that cannot push lifecycle events.
    pub fn without_events(mut self) -> Self {
        self.supports_events = false;
        self
    }

    /// Switch the chain the wallet reports from now on.
    pub fn set_chain_id(&self, chain_id: ChainId) {
        *self.chain_id.lock().unwrap() = chain_id;
    }

    /// Push an event to the subscriber. Returns `false` when nobody listens.
    pub fn emit(&self, event: ProviderEvent) -> bool {
        match self.sender.lock().unwrap().as_ref() {
            Some(sender) => sender.send(event).is_ok(),
            None => false,
        }
    }
}

#[async_trait]
impl WalletProvider for NullWallet {
    fn name(&self) -> &str {
        "null"
    }

    fn selected_address(&self) -> Option<Address> {
        self.selected
    }

    async fn accounts(&self) -> Result<Vec<Address>, ProviderError> {
        Ok(self.accounts.clone())
    }

    async fn chain_id(&self) -> Result<ChainId, ProviderError> {
        Ok(*self.chain_id.lock().unwrap())
    }

    /// Contract calls go through [`NullGateway`](crate::NullGateway) instead.
    fn rpc(&self) -> Option<DynProvider> {
        None
    }

    fn subscribe(&self) -> Option<EventReceiver> {
        if !self.supports_events {
            return None;
        }
        let (tx, rx) = mpsc::unbounded_channel();
        *self.sender.lock().unwrap() = Some(tx);
        Some(rx)
    }
}
