//! Nullable ballot contract: in-memory state plus scripted outcomes.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet, VecDeque};

use async_trait::async_trait;
use ballot_core::{BallotReader, BallotWriter, Confirmation, ContractCall, ContractTarget, RawError};
use ballot_types::{
    encode_bytes32, Address, RawProposal, RawVoterRecord, TxHash, B256, PROPOSAL_SLOTS, U256,
};

/// Which read a recorded or scripted entry refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReadKind {
    Proposal(usize),
    Voter(Address),
    Winner,
    Chairperson,
}

/// A test contract that keeps its state in memory.
///
/// Submissions succeed with a fresh hash and confirmations succeed unless
/// outcomes are queued with [`NullBallot::queue_submit`] and
/// [`NullBallot::queue_confirmation`]. A confirmed call is applied to the
/// in-memory state, so a refetch sees its effect.
pub struct NullBallot {
    proposals: RefCell<[Option<RawProposal>; PROPOSAL_SLOTS]>,
    voters: RefCell<HashMap<Address, RawVoterRecord>>,
    chairperson: Cell<Option<Address>>,
    failing: RefCell<HashSet<ReadKind>>,
    submit_results: RefCell<VecDeque<Result<TxHash, RawError>>>,
    confirmations: RefCell<VecDeque<Result<Confirmation, RawError>>>,
    pending: RefCell<HashMap<TxHash, (Address, ContractCall)>>,
    reads: RefCell<Vec<ReadKind>>,
    calls: RefCell<Vec<ContractCall>>,
    next_hash: Cell<u8>,
}

impl NullBallot {
    pub fn new() -> Self {
        Self {
            proposals: RefCell::new([None; PROPOSAL_SLOTS]),
            voters: RefCell::new(HashMap::new()),
            chairperson: Cell::new(None),
            failing: RefCell::new(HashSet::new()),
            submit_results: RefCell::new(VecDeque::new()),
            confirmations: RefCell::new(VecDeque::new()),
            pending: RefCell::new(HashMap::new()),
            reads: RefCell::new(Vec::new()),
            calls: RefCell::new(Vec::new()),
            next_hash: Cell::new(0),
        }
    }

    /// The four demo proposals with the given tallies.
    pub fn with_proposals(tallies: [u64; PROPOSAL_SLOTS]) -> Self {
        let names = ["Build Bridge", "Build School", "Build Hospital", "Build Park"];
        let ballot = Self::new();
        for (index, (name, votes)) in names.iter().zip(tallies).enumerate() {
            ballot.set_proposal(index, name, votes);
        }
        ballot
    }

    // ── State setup ────────────────────────────────────────────────────

    /// Panics if `name` does not fit in 32 bytes.
    pub fn set_proposal(&self, index: usize, name: &str, votes: u64) {
        let name = encode_bytes32(name).expect("proposal name fits in bytes32");
        self.set_raw_proposal(
            index,
            Some(RawProposal {
                name,
                vote_count: U256::from(votes),
            }),
        );
    }

    pub fn set_raw_proposal(&self, index: usize, raw: Option<RawProposal>) {
        self.proposals.borrow_mut()[index] = raw;
    }

    pub fn set_voter(&self, voter: Address, record: RawVoterRecord) {
        self.voters.borrow_mut().insert(voter, record);
    }

    /// Give `voter` a fresh right to vote with the given weight.
    pub fn give_weight(&self, voter: Address, weight: u64) {
        self.voters.borrow_mut().entry(voter).or_default().weight = U256::from(weight);
    }

    pub fn set_chairperson(&self, chairperson: Option<Address>) {
        self.chairperson.set(chairperson);
    }

    /// Make `read` fail until [`NullBallot::heal_read`] is called.
    pub fn fail_read(&self, read: ReadKind) {
        self.failing.borrow_mut().insert(read);
    }

    pub fn heal_read(&self, read: ReadKind) {
        self.failing.borrow_mut().remove(&read);
    }

    /// Script the wallet's answer to the next submission.
    pub fn queue_submit(&self, result: Result<TxHash, RawError>) {
        self.submit_results.borrow_mut().push_back(result);
    }

    /// Script the chain's answer to the next confirmation wait.
    pub fn queue_confirmation(&self, result: Result<Confirmation, RawError>) {
        self.confirmations.borrow_mut().push_back(result);
    }

    // ── Inspection ─────────────────────────────────────────────────────

    /// Every read issued so far, in order.
    pub fn reads(&self) -> Vec<ReadKind> {
        self.reads.borrow().clone()
    }

    /// Every mutating call submitted so far, in order.
    pub fn calls(&self) -> Vec<ContractCall> {
        self.calls.borrow().clone()
    }

    pub fn voter(&self, voter: Address) -> Option<RawVoterRecord> {
        self.voters.borrow().get(&voter).copied()
    }

    pub fn proposal(&self, index: usize) -> Option<RawProposal> {
        self.proposals.borrow().get(index).copied().flatten()
    }

    /// Clear recorded reads and calls, keeping the contract state.
    pub fn reset_log(&self) {
        self.reads.borrow_mut().clear();
        self.calls.borrow_mut().clear();
    }

    // ── Internals ──────────────────────────────────────────────────────

    fn track(&self, read: ReadKind) -> Result<(), RawError> {
        self.reads.borrow_mut().push(read);
        if self.failing.borrow().contains(&read) {
            return Err(RawError::new("Network request failed"));
        }
        Ok(())
    }

    fn winning_name(&self) -> B256 {
        let proposals = self.proposals.borrow();
        let mut best: Option<&RawProposal> = None;
        for raw in proposals.iter().flatten() {
            if best.map_or(true, |b| raw.vote_count > b.vote_count) {
                best = Some(raw);
            }
        }
        best.map_or(B256::ZERO, |raw| raw.name)
    }

    fn record_call(&self, from: Address, call: ContractCall) -> Result<TxHash, RawError> {
        self.calls.borrow_mut().push(call);
        let result = self
            .submit_results
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| {
                let next = self.next_hash.get().wrapping_add(1);
                self.next_hash.set(next);
                Ok(B256::repeat_byte(next))
            });
        if let Ok(tx_hash) = &result {
            self.pending.borrow_mut().insert(*tx_hash, (from, call));
        }
        result
    }

    fn apply(&self, from: Address, call: ContractCall) {
        let mut voters = self.voters.borrow_mut();
        match call {
            ContractCall::Vote(index) => {
                let sender = voters.entry(from).or_default();
                sender.voted = true;
                sender.vote = U256::from(index);
                let weight = sender.weight;
                let mut proposals = self.proposals.borrow_mut();
                if let Some(Some(raw)) = usize::try_from(index)
                    .ok()
                    .and_then(|i| proposals.get_mut(i))
                {
                    raw.vote_count += weight;
                }
            }
            ContractCall::Delegate(to) => {
                let sender = voters.entry(from).or_default();
                sender.voted = true;
                sender.delegate = to;
                let weight = sender.weight;
                voters.entry(to).or_default().weight += weight;
            }
            ContractCall::GiveRightToVote(voter) => {
                voters.entry(voter).or_default().weight = U256::from(1u64);
            }
        }
    }
}

impl Default for NullBallot {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait(?Send)]
impl BallotReader for NullBallot {
    async fn read_proposal(
        &self,
        _target: &ContractTarget,
        index: usize,
    ) -> Result<Option<RawProposal>, RawError> {
        self.track(ReadKind::Proposal(index))?;
        Ok(self.proposal(index))
    }

    async fn read_voter_record(
        &self,
        _target: &ContractTarget,
        voter: Address,
    ) -> Result<Option<RawVoterRecord>, RawError> {
        self.track(ReadKind::Voter(voter))?;
        Ok(Some(self.voter(voter).unwrap_or_default()))
    }

    async fn read_winner_name(&self, _target: &ContractTarget) -> Result<Option<B256>, RawError> {
        self.track(ReadKind::Winner)?;
        Ok(Some(self.winning_name()))
    }

    async fn read_chairperson(
        &self,
        _target: &ContractTarget,
    ) -> Result<Option<Address>, RawError> {
        self.track(ReadKind::Chairperson)?;
        Ok(self.chairperson.get())
    }
}

#[async_trait(?Send)]
impl BallotWriter for NullBallot {
    async fn submit_vote(
        &self,
        _target: &ContractTarget,
        from: Address,
        index: u64,
    ) -> Result<TxHash, RawError> {
        self.record_call(from, ContractCall::Vote(index))
    }

    async fn submit_delegate(
        &self,
        _target: &ContractTarget,
        from: Address,
        to: Address,
    ) -> Result<TxHash, RawError> {
        self.record_call(from, ContractCall::Delegate(to))
    }

    async fn submit_grant_right(
        &self,
        _target: &ContractTarget,
        from: Address,
        voter: Address,
    ) -> Result<TxHash, RawError> {
        self.record_call(from, ContractCall::GiveRightToVote(voter))
    }

    async fn await_confirmation(
        &self,
        _target: &ContractTarget,
        tx_hash: TxHash,
    ) -> Result<Confirmation, RawError> {
        let result = self
            .confirmations
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Ok(Confirmation::succeeded()));
        let pending = self.pending.borrow_mut().remove(&tx_hash);
        if let (Ok(confirmation), Some((from, call))) = (&result, pending) {
            if confirmation.success {
                self.apply(from, call);
            }
        }
        result
    }
}
