//! Election session orchestration.
//!
//! [`ElectionSession`] composes a [`ProviderSession`](elect_provider::ProviderSession)
//! and a [`ContractGateway`](elect_gateway::ContractGateway) into application
//! state: connection status, the on-chain election view, the pending
//! submission draft, the in-flight transaction and the last error. Every
//! change is published as a [`SessionState`] snapshot for the presentation
//! layer to render.

pub mod config;
pub mod error;
pub mod session;
pub mod state;

pub use config::{ClientConfig, SessionSettings};
pub use error::SessionError;
pub use session::ElectionSession;
pub use state::{
    ConnectionStatus, ElectionView, FieldKey, PendingSubmission, Seats, SessionState, TxOutcome,
};
