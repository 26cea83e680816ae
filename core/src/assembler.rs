//! View-model assembly: merge independent raw reads into one snapshot.
//!
//! Every read slot is independently pending, absent, or present, and slots
//! resolve in any order. Assembly is a pure projection of the latest raw set:
//! the same inputs always give a value-equal [`ViewModel`].

use ballot_types::{
    decode_bytes32, Address, Proposal, RawProposal, RawVoterRecord, VoterRecord, B256,
    PROPOSAL_SLOTS,
};

use crate::session::SessionIdentity;
use crate::view::ViewModel;

/// Resolution state of one remote read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadState<T> {
    /// Not resolved yet for this session.
    Pending,
    /// Resolved with no value.
    Absent,
    Present(T),
}

impl<T> ReadState<T> {
    pub fn present(&self) -> Option<&T> {
        match self {
            Self::Present(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending)
    }
}

impl<T> Default for ReadState<T> {
    fn default() -> Self {
        Self::Pending
    }
}

impl<T> From<Option<T>> for ReadState<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Self::Present(value),
            None => Self::Absent,
        }
    }
}

/// One successfully resolved read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadOutcome {
    Proposal(usize, Option<RawProposal>),
    Voter(Option<RawVoterRecord>),
    Winner(Option<B256>),
    Chairperson(Option<Address>),
}

/// The latest raw result of every read the client issues.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawReads {
    pub proposals: [ReadState<RawProposal>; PROPOSAL_SLOTS],
    pub voter: ReadState<RawVoterRecord>,
    pub winner: ReadState<B256>,
    pub chairperson: ReadState<Address>,
}

impl RawReads {
    /// Store a resolved read, replacing whatever the slot held.
    pub fn record(&mut self, outcome: ReadOutcome) {
        match outcome {
            ReadOutcome::Proposal(index, raw) => match self.proposals.get_mut(index) {
                Some(slot) => *slot = raw.into(),
                None => tracing::warn!(slot = index, "ignoring read for unknown proposal slot"),
            },
            ReadOutcome::Voter(raw) => self.voter = raw.into(),
            ReadOutcome::Winner(raw) => self.winner = raw.into(),
            ReadOutcome::Chairperson(raw) => self.chairperson = raw.into(),
        }
    }

    /// True while any read is still unresolved.
    pub fn is_loading(&self) -> bool {
        self.proposals.iter().any(ReadState::is_pending)
            || self.voter.is_pending()
            || self.winner.is_pending()
            || self.chairperson.is_pending()
    }
}

/// Build a snapshot from the raw reads of the given session.
///
/// A proposal whose name fails to decode is dropped from the list and logged;
/// the remaining proposals are still shown.
pub fn assemble(reads: &RawReads, identity: &SessionIdentity) -> ViewModel {
    let proposals = reads
        .proposals
        .iter()
        .enumerate()
        .filter_map(|(index, slot)| {
            let raw = slot.present()?;
            match Proposal::decode(index, raw) {
                Ok(proposal) => Some(proposal),
                Err(e) => {
                    tracing::warn!(slot = index, error = %e, "dropping undecodable proposal");
                    None
                }
            }
        })
        .collect();

    let winner = reads
        .winner
        .present()
        .and_then(|raw| match decode_bytes32(raw.as_slice()) {
            Ok(name) if name.is_empty() => None,
            Ok(name) => Some(name),
            Err(e) => {
                tracing::warn!(error = %e, "dropping undecodable winner name");
                None
            }
        });

    let is_chairperson = match (reads.chairperson.present(), identity.account.as_ref()) {
        (Some(chairperson), Some(account)) => chairperson == account,
        _ => false,
    };

    ViewModel {
        network: identity.network(),
        proposals,
        voter: reads.voter.present().map(VoterRecord::from),
        winner,
        is_chairperson,
    }
}
