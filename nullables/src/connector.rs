//! Nullable connector: hands out a fixed wallet or a scripted refusal.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use elect_provider::{ProviderConnector, ProviderError, WalletProvider};

use crate::NullWallet;

enum Outcome {
    Wallet(Arc<NullWallet>),
    Cancel,
    Hang,
}

/// A wallet-selection step with an in-memory cached-provider marker.
pub struct NullConnector {
    outcome: Outcome,
    cached: Mutex<Option<String>>,
    connects: Mutex<usize>,
    clears: Mutex<usize>,
}

impl NullConnector {
    /// Every connect yields `wallet`.
    pub fn new(wallet: Arc<NullWallet>) -> Self {
        Self::with_outcome(Outcome::Wallet(wallet))
    }

    /// Every connect fails as if the user dismissed the modal.
    pub fn cancelling() -> Self {
        Self::with_outcome(Outcome::Cancel)
    }

    /// Every connect waits forever, as if the wallet never answered.
    pub fn hanging() -> Self {
        Self::with_outcome(Outcome::Hang)
    }

    fn with_outcome(outcome: Outcome) -> Self {
        Self {
            outcome,
            cached: Mutex::new(None),
            connects: Mutex::new(0),
            clears: Mutex::new(0),
        }
    }

    /// Pretend an earlier run left this provider cached.
    pub fn with_cached(self, name: &str) -> Self {
        *self.cached.lock().unwrap() = Some(name.to_string());
        self
    }

    pub fn connect_count(&self) -> usize {
        *self.connects.lock().unwrap()
    }

    pub fn clear_count(&self) -> usize {
        *self.clears.lock().unwrap()
    }
}

#[async_trait]
impl ProviderConnector for NullConnector {
    fn cached_provider(&self) -> Option<String> {
        self.cached.lock().unwrap().clone()
    }

    async fn connect(&self) -> Result<Arc<dyn WalletProvider>, ProviderError> {
        *self.connects.lock().unwrap() += 1;
        match &self.outcome {
            Outcome::Wallet(wallet) => Ok(Arc::clone(wallet) as Arc<dyn WalletProvider>),
            Outcome::Cancel => Err(ProviderError::Cancelled("user closed the modal".into())),
            Outcome::Hang => std::future::pending().await,
        }
    }

    fn remember(&self, name: &str) -> Result<(), ProviderError> {
        *self.cached.lock().unwrap() = Some(name.to_string());
        Ok(())
    }

    fn clear_cached_provider(&self) -> Result<(), ProviderError> {
        *self.clears.lock().unwrap() += 1;
        *self.cached.lock().unwrap() = None;
        Ok(())
    }
}
