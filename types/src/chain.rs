//! Chain identifiers and the supported-network check.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::TypesError;

/// Numeric EIP-155 chain identifier.
pub type ChainId = u64;

/// The chains the ballot contract is deployed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportedChain {
    /// Base mainnet.
    Base,
    /// Celo mainnet.
    Celo,
}

impl SupportedChain {
    pub const ALL: [SupportedChain; 2] = [SupportedChain::Base, SupportedChain::Celo];

    /// The EIP-155 chain id.
    pub fn id(&self) -> ChainId {
        match self {
            Self::Base => 8453,
            Self::Celo => 42220,
        }
    }

    /// Look up a supported chain by id.
    pub fn from_chain_id(id: ChainId) -> Option<Self> {
        Self::ALL.into_iter().find(|chain| chain.id() == id)
    }

    /// Human-readable name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "Base",
            Self::Celo => "Celo",
        }
    }

    /// Public JSON-RPC endpoint used when none is configured.
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Self::Base => "https://mainnet.base.org",
            Self::Celo => "https://forno.celo.org",
        }
    }
}

impl fmt::Display for SupportedChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SupportedChain {
    type Err = TypesError;

    /// Accepts a chain name (`base`, `celo`) or a numeric chain id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "base" => return Ok(Self::Base),
            "celo" => return Ok(Self::Celo),
            _ => {}
        }
        s.parse::<ChainId>()
            .ok()
            .and_then(Self::from_chain_id)
            .ok_or_else(|| TypesError::UnknownChain(s.to_string()))
    }
}

/// What the client can do on the wallet's active chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NetworkStatus {
    /// No chain reported by the wallet.
    #[default]
    Disconnected,
    /// One of the supported chains.
    Supported(SupportedChain),
    /// Any other chain. Reads are disabled and a warning is surfaced.
    Unsupported(ChainId),
}

impl NetworkStatus {
    pub fn from_chain_id(chain_id: Option<ChainId>) -> Self {
        match chain_id {
            None => Self::Disconnected,
            Some(id) => match SupportedChain::from_chain_id(id) {
                Some(chain) => Self::Supported(chain),
                None => Self::Unsupported(id),
            },
        }
    }

    pub fn supported(&self) -> Option<SupportedChain> {
        match self {
            Self::Supported(chain) => Some(*chain),
            _ => None,
        }
    }

    /// Warning shown while on an unsupported chain.
    pub fn warning(&self) -> Option<String> {
        match self {
            Self::Unsupported(_) => {
                let names: Vec<&str> = SupportedChain::ALL.iter().map(|c| c.as_str()).collect();
                Some(format!("Please switch to {}", names.join(" or ")))
            }
            _ => None,
        }
    }
}
