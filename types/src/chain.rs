//! Chain identifiers and the static chain registry.
//!
//! The registry maps a chain id to display metadata: the network name used to
//! configure wallet connectors before a connection exists, a public RPC
//! endpoint, and the block explorer used to link submitted transactions.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{TxHash, TypesError};

/// An EIP-155 chain identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(u64);

impl ChainId {
    /// Ethereum mainnet, the chain assumed before any wallet is connected.
    pub const MAINNET: Self = Self(1);

    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl Default for ChainId {
    fn default() -> Self {
        Self::MAINNET
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Display metadata for a known chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChainData {
    pub name: &'static str,
    pub short_name: &'static str,
    pub network: &'static str,
    pub chain_id: ChainId,
    pub rpc_url: &'static str,
    /// Explorer base, e.g. `https://kovan.etherscan.io`. Empty for local chains.
    pub explorer_url: &'static str,
}

impl ChainData {
    /// Link to a transaction on this chain's explorer, if it has one.
    pub fn tx_url(&self, hash: &TxHash) -> Option<String> {
        if self.explorer_url.is_empty() {
            None
        } else {
            Some(format!("{}/tx/{}", self.explorer_url, hash))
        }
    }
}

const SUPPORTED_CHAINS: &[ChainData] = &[
    ChainData {
        name: "Ethereum Mainnet",
        short_name: "eth",
        network: "mainnet",
        chain_id: ChainId(1),
        rpc_url: "https://mainnet.infura.io/v3/",
        explorer_url: "https://etherscan.io",
    },
    ChainData {
        name: "Ethereum Ropsten",
        short_name: "rop",
        network: "ropsten",
        chain_id: ChainId(3),
        rpc_url: "https://ropsten.infura.io/v3/",
        explorer_url: "https://ropsten.etherscan.io",
    },
    ChainData {
        name: "Ethereum Rinkeby",
        short_name: "rin",
        network: "rinkeby",
        chain_id: ChainId(4),
        rpc_url: "https://rinkeby.infura.io/v3/",
        explorer_url: "https://rinkeby.etherscan.io",
    },
    ChainData {
        name: "Ethereum Görli",
        short_name: "gor",
        network: "goerli",
        chain_id: ChainId(5),
        rpc_url: "https://goerli.infura.io/v3/",
        explorer_url: "https://goerli.etherscan.io",
    },
    ChainData {
        name: "Ethereum Kovan",
        short_name: "kov",
        network: "kovan",
        chain_id: ChainId(42),
        rpc_url: "https://kovan.infura.io/v3/",
        explorer_url: "https://kovan.etherscan.io",
    },
    ChainData {
        name: "Ethereum Sepolia",
        short_name: "sep",
        network: "sepolia",
        chain_id: ChainId(11155111),
        rpc_url: "https://sepolia.infura.io/v3/",
        explorer_url: "https://sepolia.etherscan.io",
    },
    ChainData {
        name: "Local Development",
        short_name: "dev",
        network: "dev",
        chain_id: ChainId(1337),
        rpc_url: "http://127.0.0.1:8545",
        explorer_url: "",
    },
    ChainData {
        name: "Local Hardhat",
        short_name: "hh",
        network: "hardhat",
        chain_id: ChainId(31337),
        rpc_url: "http://127.0.0.1:8545",
        explorer_url: "",
    },
];

/// Look up the metadata for a chain.
pub fn chain_data(chain_id: ChainId) -> Result<&'static ChainData, TypesError> {
    SUPPORTED_CHAINS
        .iter()
        .find(|chain| chain.chain_id == chain_id)
        .ok_or(TypesError::UnsupportedChain(chain_id.get()))
}

/// The network name for a chain, as wallet connectors expect it.
pub fn network_for(chain_id: ChainId) -> Result<&'static str, TypesError> {
    chain_data(chain_id).map(|chain| chain.network)
}

/// Explorer link for a transaction, or `None` for unknown or local chains.
pub fn explorer_tx_url(chain_id: ChainId, hash: &TxHash) -> Option<String> {
    chain_data(chain_id).ok().and_then(|chain| chain.tx_url(hash))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kovan_link_matches_etherscan_layout() {
        let hash = TxHash::repeat_byte(0x42);
        let url = explorer_tx_url(ChainId::new(42), &hash).unwrap();
        assert_eq!(url, format!("https://kovan.etherscan.io/tx/0x{}", "42".repeat(32)));
    }

    #[test]
    fn local_chain_has_no_explorer() {
        assert!(explorer_tx_url(ChainId::new(1337), &TxHash::ZERO).is_none());
        assert_eq!(network_for(ChainId::new(1337)).unwrap(), "dev");
    }

    #[test]
    fn unknown_chain_is_an_error() {
        assert_eq!(
            chain_data(ChainId::new(999_999)),
            Err(TypesError::UnsupportedChain(999_999))
        );
        assert!(explorer_tx_url(ChainId::new(999_999), &TxHash::ZERO).is_none());
    }

    #[test]
    fn default_chain_is_mainnet() {
        assert_eq!(ChainId::default(), ChainId::MAINNET);
        assert_eq!(network_for(ChainId::default()).unwrap(), "mainnet");
    }
}
