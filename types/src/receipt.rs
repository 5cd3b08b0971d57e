//! Mined transaction receipts.

use serde::{Deserialize, Serialize};

use crate::TxHash;

/// Outcome of a mined transaction, as reported by its receipt status code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TxStatus {
    /// Status 1: the state change was applied.
    Success,
    /// Any other status: mined but reverted.
    Reverted(u64),
}

impl TxStatus {
    pub fn from_code(code: u64) -> Self {
        if code == 1 {
            Self::Success
        } else {
            Self::Reverted(code)
        }
    }

    pub fn code(&self) -> u64 {
        match self {
            Self::Success => 1,
            Self::Reverted(code) => *code,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Receipt returned once a pending transaction is mined.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub transaction_hash: TxHash,
    pub status: TxStatus,
    pub block_number: Option<u64>,
    /// Revert reason, when the node or contract reports one.
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_one_is_success() {
        assert!(TxStatus::from_code(1).is_success());
        assert_eq!(TxStatus::from_code(0), TxStatus::Reverted(0));
        assert_eq!(TxStatus::from_code(7).code(), 7);
    }
}
