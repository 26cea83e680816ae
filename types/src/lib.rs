//! Fundamental types for the ballot client.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! addresses, chain identifiers, fixed-length byte-string names, and the raw and
//! decoded forms of the records the ballot contract exposes.

pub mod address;
pub mod bytes32;
pub mod chain;
pub mod error;
pub mod proposal;
pub mod voter;

pub use address::parse_address;
pub use bytes32::{decode_bytes32, encode_bytes32};
pub use chain::{ChainId, NetworkStatus, SupportedChain};
pub use error::TypesError;
pub use proposal::{Proposal, RawProposal, PROPOSAL_SLOTS};
pub use voter::{RawVoterRecord, VoteTarget, VoterRecord};

pub use alloy_primitives::{Address, B256, U256};

/// Handle returned by the wallet for a submitted transaction.
pub type TxHash = B256;
