//! Client configuration with TOML file support.

use ballot_types::{Address, SupportedChain};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::contract::ContractTarget;
use crate::CoreError;

/// Ballot contract address per supported chain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractAddresses {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub celo: Option<Address>,
}

impl ContractAddresses {
    pub fn get(&self, chain: SupportedChain) -> Option<Address> {
        match chain {
            SupportedChain::Base => self.base,
            SupportedChain::Celo => self.celo,
        }
    }

    pub fn set(&mut self, chain: SupportedChain, address: Address) {
        match chain {
            SupportedChain::Base => self.base = Some(address),
            SupportedChain::Celo => self.celo = Some(address),
        }
    }

    /// The deployment to talk to on `chain`, if one is configured.
    pub fn target(&self, chain: SupportedChain) -> Option<ContractTarget> {
        self.get(chain).map(|address| ContractTarget { chain, address })
    }
}

/// JSON-RPC endpoint overrides per supported chain.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcEndpoints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub celo: Option<String>,
}

impl RpcEndpoints {
    /// Configured endpoint, falling back to the chain's public one.
    pub fn url(&self, chain: SupportedChain) -> String {
        let configured = match chain {
            SupportedChain::Base => self.base.as_deref(),
            SupportedChain::Celo => self.celo.as_deref(),
        };
        configured
            .unwrap_or_else(|| chain.default_rpc_url())
            .to_string()
    }

    pub fn set(&mut self, chain: SupportedChain, url: String) {
        match chain {
            SupportedChain::Base => self.base = Some(url),
            SupportedChain::Celo => self.celo = Some(url),
        }
    }
}

/// Configuration for the ballot client.
///
/// Can be loaded from a TOML file via [`ClientConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub contracts: ContractAddresses,

    #[serde(default)]
    pub rpc: RpcEndpoints,

    /// Delay between transaction receipt polls.
    #[serde(default = "default_receipt_poll_interval_ms")]
    pub receipt_poll_interval_ms: u64,

    /// Give up waiting for a receipt after this long.
    #[serde(default = "default_confirmation_timeout_secs")]
    pub confirmation_timeout_secs: u64,

    /// Per-request HTTP timeout.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_receipt_poll_interval_ms() -> u64 {
    2_000
}

fn default_confirmation_timeout_secs() -> u64 {
    300
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "warn".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| CoreError::Config(format!("{}: {e}", path.as_ref().display())))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, CoreError> {
        toml::from_str(s).map_err(|e| CoreError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, CoreError> {
        toml::to_string_pretty(self).map_err(|e| CoreError::Config(e.to_string()))
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            contracts: ContractAddresses::default(),
            rpc: RpcEndpoints::default(),
            receipt_poll_interval_ms: default_receipt_poll_interval_ms(),
            confirmation_timeout_secs: default_confirmation_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
