//! Error type shared by the fundamental types.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TypesError {
    #[error("address is empty")]
    EmptyAddress,

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("byte string is not valid UTF-8: {0}")]
    InvalidUtf8(String),

    #[error("name is {0} bytes, longer than 32")]
    NameTooLong(usize),

    #[error("unknown chain: {0}")]
    UnknownChain(String),
}
