//! Error type for looking up shared types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("chain id {0} missing or not supported")]
    UnsupportedChain(u64),
}
