//! Client configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use elect_gateway::{us_election_abi, JsonAbi};
use elect_provider::ProviderOption;
use elect_types::{Address, ChainId};

use crate::SessionError;

/// Configuration for the election client.
///
/// Can be loaded from a TOML file via [`ClientConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Address of the deployed election contract.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_address: Option<Address>,

    /// ABI JSON to use instead of the bundled `USElection` interface.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub abi_path: Option<PathBuf>,

    /// Chain assumed before a wallet reports one.
    #[serde(default)]
    pub default_chain_id: ChainId,

    /// Directory holding the cached-provider marker.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Remember the chosen wallet and reconnect to it on startup.
    #[serde(default = "default_true")]
    pub cache_provider: bool,

    /// How long to wait for the wallet to hand out a provider.
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// How long to wait for a submitted transaction to be mined.
    #[serde(default = "default_receipt_timeout_secs")]
    pub receipt_timeout_secs: u64,

    /// Receipt polling interval.
    #[serde(default = "default_receipt_poll_interval_ms")]
    pub receipt_poll_interval_ms: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Wallets offered for connection, in preference order.
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderOption>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_data_dir() -> PathBuf {
    PathBuf::from("./elect_data")
}

fn default_true() -> bool {
    true
}

fn default_connect_timeout_secs() -> u64 {
    120
}

fn default_receipt_timeout_secs() -> u64 {
    600
}

fn default_receipt_poll_interval_ms() -> u64 {
    2_000
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_providers() -> Vec<ProviderOption> {
    vec![ProviderOption {
        name: "local".to_string(),
        url: "http://127.0.0.1:8545".to_string(),
        account: None,
    }]
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, SessionError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SessionError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, SessionError> {
        toml::from_str(s).map_err(|e| SessionError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("ClientConfig is always serializable to TOML")
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn receipt_timeout(&self) -> Duration {
        Duration::from_secs(self.receipt_timeout_secs)
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_interval_ms)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            contract_address: None,
            abi_path: None,
            default_chain_id: ChainId::default(),
            data_dir: default_data_dir(),
            cache_provider: default_true(),
            connect_timeout_secs: default_connect_timeout_secs(),
            receipt_timeout_secs: default_receipt_timeout_secs(),
            receipt_poll_interval_ms: default_receipt_poll_interval_ms(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            providers: default_providers(),
        }
    }
}

/// What an [`ElectionSession`](crate::ElectionSession) needs to know about
/// the contract and its time limits.
#[derive(Clone, Debug)]
pub struct SessionSettings {
    pub contract_address: Address,
    pub abi: JsonAbi,
    pub default_chain_id: ChainId,
    pub connect_timeout: Duration,
    pub receipt_timeout: Duration,
}

impl SessionSettings {
    /// Settings for the bundled interface with default limits.
    pub fn new(contract_address: Address) -> Self {
        Self {
            contract_address,
            abi: us_election_abi(),
            default_chain_id: ChainId::default(),
            connect_timeout: Duration::from_secs(default_connect_timeout_secs()),
            receipt_timeout: Duration::from_secs(default_receipt_timeout_secs()),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, SessionError> {
        let contract_address = config
            .contract_address
            .ok_or_else(|| SessionError::Config("contract_address is not set".into()))?;

        let abi = match &config.abi_path {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|e| {
                    SessionError::Config(format!("failed to read ABI {}: {e}", path.display()))
                })?;
                serde_json::from_str(&json).map_err(|e| {
                    SessionError::Config(format!("invalid ABI {}: {e}", path.display()))
                })?
            }
            None => us_election_abi(),
        };

        Ok(Self {
            contract_address,
            abi,
            default_chain_id: config.default_chain_id,
            connect_timeout: config.connect_timeout(),
            receipt_timeout: config.receipt_timeout(),
        })
    }
}
