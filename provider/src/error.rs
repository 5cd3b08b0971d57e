use std::time::Duration;

use alloy::transports::TransportError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("wallet connection cancelled: {0}")]
    Cancelled(String),

    #[error("timed out after {0:?} waiting for the wallet")]
    Timeout(Duration),

    #[error("wallet exposed no accounts")]
    NoAccounts,

    #[error("invalid wallet endpoint: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("JSON-RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("unsupported: {0}")]
    Unsupported(String),

    #[error("provider cache error: {0}")]
    Cache(String),
}

impl From<TransportError> for ProviderError {
    /// Error responses from the wallet keep their JSON-RPC code; everything
    /// else is a transport failure.
    fn from(err: TransportError) -> Self {
        match err.as_error_resp() {
            Some(payload) => Self::Rpc {
                code: payload.code,
                message: payload.message.to_string(),
            },
            None => Self::Transport(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::rpc::json_rpc::ErrorPayload;
    use alloy::transports::TransportErrorKind;

    #[test]
    fn error_responses_keep_their_code() {
        let payload: ErrorPayload =
            serde_json::from_str(r#"{"code":4001,"message":"User rejected"}"#).unwrap();
        let err = ProviderError::from(TransportError::ErrorResp(payload));
        assert!(matches!(err, ProviderError::Rpc { code: 4001, ref message } if message == "User rejected"));
    }

    #[test]
    fn other_failures_are_transport_errors() {
        let err = ProviderError::from(TransportErrorKind::backend_gone());
        assert!(matches!(err, ProviderError::Transport(_)));
    }
}
