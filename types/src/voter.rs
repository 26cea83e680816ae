//! Voter records.

use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// A voter record exactly as the contract returns it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawVoterRecord {
    pub weight: U256,
    pub voted: bool,
    /// Zero when the voter has not delegated.
    pub delegate: Address,
    /// Only meaningful when `voted` is set.
    pub vote: U256,
}

/// A decoded voter record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VoterRecord {
    pub weight: U256,
    pub has_voted: bool,
    pub delegate: Option<Address>,
    pub chosen_proposal_index: Option<u64>,
}

/// Where a voter's weight went, as displayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VoteTarget {
    NotVoted,
    Delegated(Address),
    Proposal(u64),
}

impl From<&RawVoterRecord> for VoterRecord {
    fn from(raw: &RawVoterRecord) -> Self {
        let delegate = (raw.delegate != Address::ZERO).then_some(raw.delegate);
        let chosen_proposal_index = if raw.voted && raw.vote <= U256::from(u64::MAX) {
            Some(raw.vote.to::<u64>())
        } else {
            None
        };
        Self {
            weight: raw.weight,
            has_voted: raw.voted,
            delegate,
            chosen_proposal_index,
        }
    }
}

impl VoterRecord {
    /// Weight above zero means the chairperson granted a right to vote.
    pub fn has_voting_rights(&self) -> bool {
        !self.weight.is_zero()
    }

    /// Delegation takes precedence over a direct choice.
    pub fn vote_target(&self) -> VoteTarget {
        if !self.has_voted {
            return VoteTarget::NotVoted;
        }
        match (self.delegate, self.chosen_proposal_index) {
            (Some(delegate), _) => VoteTarget::Delegated(delegate),
            (None, Some(index)) => VoteTarget::Proposal(index),
            (None, None) => VoteTarget::NotVoted,
        }
    }
}
