//! Ballot proposals.

use alloy_primitives::{B256, U256};
use serde::{Deserialize, Serialize};

use crate::bytes32::decode_bytes32;
use crate::error::TypesError;

/// Number of proposal slots the client reads.
pub const PROPOSAL_SLOTS: usize = 4;

/// A proposal exactly as the contract returns it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawProposal {
    /// Zero-padded UTF-8 name.
    pub name: B256,
    /// Cumulative weighted tally.
    pub vote_count: U256,
}

/// A decoded proposal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Proposal {
    pub name: String,
    pub vote_count: U256,
    /// The slot this proposal was read from.
    pub index: usize,
}

impl Proposal {
    /// Decode the raw record read from slot `index`.
    pub fn decode(index: usize, raw: &RawProposal) -> Result<Self, TypesError> {
        Ok(Self {
            name: decode_bytes32(raw.name.as_slice())?,
            vote_count: raw.vote_count,
            index,
        })
    }
}
