//! Lifecycle events pushed by a wallet provider.

use crate::{Address, ChainId};

/// An event emitted by a connected wallet provider.
///
/// Delivered at most once per occurrence; consumers must tolerate receiving
/// any event zero or many times.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ProviderEvent {
    /// The wallet closed the session.
    Close,
    /// The user switched accounts; the first entry is the active one.
    AccountsChanged(Vec<Address>),
    /// The wallet switched networks.
    NetworkChanged(ChainId),
}
