//! JSON-RPC client for the ballot contract.
//!
//! Provides:
//! - ABI encoding of the contract's calls and decoding of its returns
//! - A minimal Ethereum JSON-RPC transport (`eth_call`, `eth_sendTransaction`,
//!   receipts, chain id)
//! - [`BallotRpc`], which implements the core's reader and writer traits

pub mod abi;
pub mod ballot;
pub mod client;
pub mod error;

pub use ballot::BallotRpc;
pub use client::{EthRpcClient, Receipt};
pub use error::RpcError;
