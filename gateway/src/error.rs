use alloy::providers::PendingTransactionError;
use elect_provider::ProviderError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("invalid ABI: {0}")]
    InvalidAbi(String),

    #[error("ABI has no function named {0:?}")]
    MissingFunction(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("contract call failed: {0}")]
    Contract(#[source] alloy::contract::Error),

    #[error("waiting for receipt failed: {0}")]
    Receipt(#[from] PendingTransactionError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl From<alloy::contract::Error> for GatewayError {
    /// Wallet and node failures keep their JSON-RPC code, so a rejected
    /// signature stays recognisable.
    fn from(err: alloy::contract::Error) -> Self {
        match err {
            alloy::contract::Error::TransportError(e) => Self::Provider(e.into()),
            other => Self::Contract(other),
        }
    }
}
