use std::time::Duration;

use elect_gateway::GatewayError;
use elect_provider::ProviderError;
use elect_types::TxHash;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("not connected to a wallet")]
    NotConnected,

    #[error("the election has ended; no further transactions are accepted")]
    ElectionEnded,

    #[error("submission is incomplete: missing {}", .0.join(", "))]
    IncompleteSubmission(Vec<&'static str>),

    #[error("no receipt for transaction {hash} after {timeout:?}")]
    ReceiptTimeout { hash: TxHash, timeout: Duration },

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}
