//! Wallet provider sessions for the election client.
//!
//! - [`WalletProvider`]: the raw provider a wallet hands out (accounts,
//!   network, an alloy JSON-RPC handle, optional lifecycle event stream).
//! - [`ProviderConnector`]: the wallet-selection step that produces a provider
//!   and remembers the choice across runs.
//! - [`Library`]: network and account queries layered over a provider.
//! - [`ProviderSession`]: owns one connection and translates provider events
//!   into session updates.

pub mod cache;
pub mod connector;
pub mod error;
pub mod http;
pub mod library;
pub mod provider;
pub mod session;

pub use cache::CachedProviderStore;
pub use connector::{ProviderConnector, ProviderOption, WalletConnector};
pub use error::ProviderError;
pub use http::HttpWalletProvider;
pub use library::{Library, Network};
pub use provider::{EventReceiver, WalletProvider};
pub use session::{Connection, ProviderSession, SessionUpdate};
