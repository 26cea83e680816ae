//! The snapshot the presentation layer renders.

use ballot_types::{NetworkStatus, Proposal, VoteTarget, VoterRecord, U256};

/// Everything known about the ballot for the current session.
///
/// Always rebuilt as a whole by [`crate::assembler::assemble`]; never patched
/// field by field.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewModel {
    pub network: NetworkStatus,
    /// Decoded proposals, ascending by slot index.
    pub proposals: Vec<Proposal>,
    pub voter: Option<VoterRecord>,
    /// Current leader, absent until the contract reports a name.
    pub winner: Option<String>,
    pub is_chairperson: bool,
}

impl ViewModel {
    pub fn has_voted(&self) -> bool {
        self.voter.is_some_and(|v| v.has_voted)
    }

    pub fn voting_weight(&self) -> U256 {
        self.voter.map_or(U256::ZERO, |v| v.weight)
    }

    pub fn has_right_to_vote(&self) -> bool {
        self.voter.is_some_and(|v| v.has_voting_rights())
    }

    pub fn vote_target(&self) -> VoteTarget {
        self.voter.map_or(VoteTarget::NotVoted, |v| v.vote_target())
    }

    pub fn leader(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    /// Look up a proposal by slot index.
    pub fn proposal(&self, index: usize) -> Option<&Proposal> {
        self.proposals.iter().find(|p| p.index == index)
    }

    pub fn warning(&self) -> Option<String> {
        self.network.warning()
    }

    /// Degraded mode: an unsupported chain is active.
    pub fn is_degraded(&self) -> bool {
        matches!(self.network, NetworkStatus::Unsupported(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_types::{Address, SupportedChain};

    #[test]
    fn test_empty_view_defaults() {
        let view = ViewModel::default();
        assert!(!view.has_voted());
        assert_eq!(view.voting_weight(), U256::ZERO);
        assert!(!view.has_right_to_vote());
        assert_eq!(view.vote_target(), VoteTarget::NotVoted);
        assert_eq!(view.leader(), None);
        assert!(!view.is_degraded());
    }

    #[test]
    fn test_voter_accessors() {
        let view = ViewModel {
            network: NetworkStatus::Supported(SupportedChain::Base),
            voter: Some(VoterRecord {
                weight: U256::from(3u64),
                has_voted: true,
                delegate: Some(Address::repeat_byte(9)),
                chosen_proposal_index: Some(1),
            }),
            ..ViewModel::default()
        };
        assert!(view.has_voted());
        assert_eq!(view.voting_weight(), U256::from(3u64));
        assert!(view.has_right_to_vote());
        assert_eq!(
            view.vote_target(),
            VoteTarget::Delegated(Address::repeat_byte(9))
        );
    }

    #[test]
    fn test_degraded_mode() {
        let view = ViewModel {
            network: NetworkStatus::Unsupported(1),
            ..ViewModel::default()
        };
        assert!(view.is_degraded());
        assert!(view.warning().is_some());
    }
}
