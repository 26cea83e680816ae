//! RPC error types.

use ballot_core::{RawError, Revert};
use ballot_types::TxHash;
use thiserror::Error;

use crate::abi;

/// EIP-1193 code for a request the user declined.
pub const USER_REJECTED_CODE: i64 = 4001;

#[derive(Debug, Error)]
pub enum RpcError {
    #[error("Network request failed: {0}")]
    Transport(String),

    #[error("Network error: node returned HTTP {0}")]
    Http(u16),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("{message}")]
    Node {
        code: i64,
        message: String,
        /// Hex-encoded revert data, if the node attached any.
        data: Option<String>,
    },

    #[error("malformed contract return: {0}")]
    Abi(String),

    #[error("transaction {0} was not confirmed in time")]
    Timeout(TxHash),

    #[error("no RPC endpoint for chain {0}")]
    NoEndpoint(String),
}

impl RpcError {
    /// Revert payload attached to a node error.
    pub fn revert(&self) -> Option<Revert> {
        let Self::Node { data: Some(data), .. } = self else {
            return None;
        };
        let bytes = hex::decode(data.trim_start_matches("0x")).ok()?;
        abi::decode_revert(&bytes)
    }

    /// The node refused the call because it would revert.
    pub fn is_revert(&self) -> bool {
        match self {
            Self::Node { message, .. } => {
                self.revert().is_some() || message.contains("execution reverted")
            }
            _ => false,
        }
    }

    /// The request never got a JSON-RPC answer. Worth retrying.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Http(_))
    }
}

impl From<reqwest::Error> for RpcError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            RpcError::Transport(format!("request timed out: {e}"))
        } else if e.is_connect() {
            RpcError::Transport(format!("connection failed: {e}"))
        } else {
            RpcError::Transport(e.to_string())
        }
    }
}

impl From<RpcError> for RawError {
    fn from(e: RpcError) -> Self {
        match &e {
            RpcError::Node { code, .. } if *code == USER_REJECTED_CODE => {
                RawError::user_rejected().with_short_message(e.to_string())
            }
            RpcError::Node { .. } => {
                let raw = RawError::new(e.to_string());
                match e.revert() {
                    Some(revert) => raw.with_revert(revert),
                    None => raw,
                }
            }
            RpcError::Transport(_) | RpcError::Http(_) => {
                RawError::new(e.to_string()).with_name("HttpRequestError")
            }
            _ => RawError::new(e.to_string()),
        }
    }
}
