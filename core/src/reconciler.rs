//! The reconciliation owner.
//!
//! [`Reconciler`] exclusively owns the raw read set, the published
//! [`ViewModel`], the transaction coordinator, and the session guard. It is
//! driven by events (identity reports, read batches, wallet and chain
//! callbacks) and never performs I/O itself; see [`crate::driver`] for the
//! async loop that feeds it.

use ballot_types::{TxHash, U256};

use crate::assembler::{assemble, RawReads};
use crate::classify::RawError;
use crate::config::ContractAddresses;
use crate::contract::{Confirmation, ContractTarget};
use crate::coordinator::{
    Action, ActionContext, Settlement, Submission, Ticket, TransactionCoordinator,
};
use crate::refetch::{ReadBatch, ReadPlan, ReadRequest};
use crate::session::{Epoch, SessionGuard, SessionIdentity};
use crate::view::ViewModel;

pub struct Reconciler {
    contracts: ContractAddresses,
    guard: SessionGuard,
    reads: RawReads,
    view: ViewModel,
    coordinator: TransactionCoordinator,
    connect_prompt_open: bool,
}

impl Reconciler {
    pub fn new(contracts: ContractAddresses) -> Self {
        Self {
            contracts,
            guard: SessionGuard::new(),
            reads: RawReads::default(),
            view: ViewModel::default(),
            coordinator: TransactionCoordinator::new(),
            connect_prompt_open: false,
        }
    }

    pub fn identity(&self) -> &SessionIdentity {
        self.guard.identity()
    }

    pub fn epoch(&self) -> Epoch {
        self.guard.epoch()
    }

    /// The current snapshot.
    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    pub fn coordinator(&self) -> &TransactionCoordinator {
        &self.coordinator
    }

    /// True until every read of the current session has resolved once.
    pub fn is_loading(&self) -> bool {
        self.reads_enabled() && self.reads.is_loading()
    }

    // ── Session ────────────────────────────────────────────────────────

    /// Apply the identity reported by the wallet.
    ///
    /// On a change, all derived state is cleared before this returns, so no
    /// data from the old identity can be rendered under the new one. Returns
    /// whether the identity changed.
    pub fn set_identity(&mut self, identity: SessionIdentity) -> bool {
        let Some(change) = self.guard.observe(identity) else {
            return false;
        };
        self.reads = RawReads::default();
        self.coordinator.reset();
        self.connect_prompt_open = false;
        self.republish();
        tracing::info!(
            epoch = change.epoch,
            account = ?change.current.account,
            chain_id = ?change.current.chain_id,
            "session identity changed, local state cleared"
        );
        true
    }

    /// Ask for a wallet connection. Dismissed by the next identity change.
    pub fn open_connect_prompt(&mut self) {
        self.connect_prompt_open = true;
    }

    pub fn connect_prompt_open(&self) -> bool {
        self.connect_prompt_open
    }

    // ── Reads ──────────────────────────────────────────────────────────

    /// The contract deployment for the active chain.
    pub fn contract_target(&self) -> Option<ContractTarget> {
        let chain = self.identity().network().supported()?;
        self.contracts.target(chain)
    }

    /// Reads are issued only on a supported chain with a known contract.
    pub fn reads_enabled(&self) -> bool {
        self.contract_target().is_some()
    }

    /// Everything to read for the current session. `None` in degraded mode.
    pub fn initial_reads(&self) -> Option<ReadRequest> {
        self.read_request(ReadPlan::full(self.identity().account))
    }

    fn read_request(&self, plan: ReadPlan) -> Option<ReadRequest> {
        let target = self.contract_target()?;
        Some(ReadRequest {
            epoch: self.epoch(),
            target,
            plan,
        })
    }

    /// Merge a completed batch and republish the snapshot.
    ///
    /// A batch made for an earlier session is discarded. Returns whether the
    /// batch was applied.
    pub fn apply_reads(&mut self, batch: ReadBatch) -> bool {
        if !self.guard.is_current(batch.epoch) {
            tracing::debug!(
                batch_epoch = batch.epoch,
                current_epoch = self.epoch(),
                "discarding read batch from a previous session"
            );
            return false;
        }
        for outcome in batch.outcomes {
            self.reads.record(outcome);
        }
        self.republish();
        true
    }

    fn republish(&mut self) {
        self.view = assemble(&self.reads, self.guard.identity());
    }

    // ── Mutations ──────────────────────────────────────────────────────

    fn context(&self) -> ActionContext<'_> {
        ActionContext {
            identity: self.guard.identity(),
            target: self.contract_target(),
            view: &self.view,
        }
    }

    /// Submit a user action. Returns the call to issue, if accepted.
    pub fn request(&mut self, action: Action) -> Option<Submission> {
        let ctx = ActionContext {
            identity: self.guard.identity(),
            target: self.contract_target(),
            view: &self.view,
        };
        self.coordinator.request(action, &ctx)
    }

    pub fn vote(&mut self, index: u64) -> Option<Submission> {
        self.request(Action::Vote(index))
    }

    pub fn delegate(&mut self, to: &str) -> Option<Submission> {
        self.request(Action::Delegate(to.to_string()))
    }

    pub fn grant_right(&mut self, voter: &str) -> Option<Submission> {
        self.request(Action::GrantRight(voter.to_string()))
    }

    pub fn is_busy(&self) -> bool {
        self.coordinator.is_busy()
    }

    /// Whether `action` would be accepted right now.
    pub fn allows(&self, action: &Action) -> bool {
        self.coordinator.allows(action, &self.context())
    }

    pub fn can_vote(&self) -> bool {
        self.allows(&Action::Vote(0))
    }

    pub fn can_delegate(&self, to: &str) -> bool {
        self.allows(&Action::Delegate(to.to_string()))
    }

    pub fn can_grant_right(&self, voter: &str) -> bool {
        self.allows(&Action::GrantRight(voter.to_string()))
    }

    pub fn set_delegate_input(&mut self, text: impl Into<String>) {
        self.coordinator.set_delegate_input(text);
    }

    pub fn set_grant_input(&mut self, text: impl Into<String>) {
        self.coordinator.set_grant_input(text);
    }

    /// Wallet callback. Returns the handle to await, if any.
    pub fn on_submitted(
        &mut self,
        ticket: Ticket,
        result: Result<TxHash, RawError>,
    ) -> Option<TxHash> {
        self.coordinator.on_submitted(ticket, result)
    }

    /// Chain callback. On success, returns the refetch to run; the current
    /// snapshot stays published until that batch is applied.
    pub fn on_confirmed(
        &mut self,
        ticket: Ticket,
        result: Result<Confirmation, RawError>,
    ) -> Option<ReadRequest> {
        let settlement = self.coordinator.on_confirmed(ticket, result)?;
        if !settlement.is_success() {
            return None;
        }
        self.read_request(ReadPlan::after_settlement(self.identity().account))
    }

    pub fn settlement(&self) -> Option<&Settlement> {
        self.coordinator.settlement()
    }

    // ── Status ─────────────────────────────────────────────────────────

    pub fn vote_status(&self) -> Option<String> {
        self.coordinator.vote_status()
    }

    pub fn delegate_status(&self) -> Option<String> {
        self.coordinator.delegate_status()
    }

    pub fn grant_status(&self) -> Option<String> {
        self.coordinator.grant_status()
    }

    pub fn has_voted(&self) -> bool {
        self.view.has_voted()
    }

    pub fn voting_weight(&self) -> U256 {
        self.view.voting_weight()
    }

    pub fn has_right_to_vote(&self) -> bool {
        self.view.has_right_to_vote()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembler::ReadOutcome;
    use ballot_types::{encode_bytes32, Address, RawProposal, RawVoterRecord, B256};

    const BASE: u64 = 8453;

    fn contracts() -> ContractAddresses {
        ContractAddresses {
            base: Some(Address::repeat_byte(0xCC)),
            celo: None,
        }
    }

    fn account(byte: u8) -> Address {
        Address::repeat_byte(byte)
    }

    fn batch(epoch: Epoch, weight: u64, voted: bool) -> ReadBatch {
        ReadBatch {
            epoch,
            outcomes: vec![
                ReadOutcome::Proposal(
                    0,
                    Some(RawProposal {
                        name: encode_bytes32("Build Bridge").unwrap(),
                        vote_count: U256::from(2u64),
                    }),
                ),
                ReadOutcome::Voter(Some(RawVoterRecord {
                    weight: U256::from(weight),
                    voted,
                    delegate: Address::ZERO,
                    vote: U256::ZERO,
                })),
            ],
            failed: 0,
        }
    }

    fn connected(byte: u8) -> Reconciler {
        let mut rec = Reconciler::new(contracts());
        rec.set_identity(SessionIdentity::new(Some(account(byte)), Some(BASE)));
        rec
    }

    #[test]
    fn test_reads_disabled_without_chain_or_contract() {
        let mut rec = Reconciler::new(contracts());
        assert!(rec.initial_reads().is_none());

        rec.set_identity(SessionIdentity::new(Some(account(1)), Some(42220)));
        assert!(rec.initial_reads().is_none(), "no contract on celo");

        rec.set_identity(SessionIdentity::new(Some(account(1)), Some(1)));
        assert!(rec.initial_reads().is_none());
        assert!(rec.view().is_degraded());
        assert_eq!(
            rec.view().warning().as_deref(),
            Some("Please switch to Base or Celo")
        );
    }

    #[test]
    fn test_initial_reads_cover_everything() {
        let rec = connected(1);
        let request = rec.initial_reads().unwrap();
        assert_eq!(request.epoch, rec.epoch());
        assert_eq!(request.plan, ReadPlan::full(Some(account(1))));
        assert_eq!(request.target.address, Address::repeat_byte(0xCC));
    }

    #[test]
    fn test_apply_current_batch() {
        let mut rec = connected(1);
        assert!(rec.is_loading());
        assert!(rec.apply_reads(batch(rec.epoch(), 1, false)));
        assert_eq!(rec.view().proposals.len(), 1);
        assert!(rec.has_right_to_vote());
        assert!(rec.can_vote());
    }

    #[test]
    fn test_identity_change_clears_state_and_discards_stale_batch() {
        let mut rec = connected(1);
        let old_epoch = rec.epoch();
        rec.apply_reads(batch(old_epoch, 1, true));
        rec.open_connect_prompt();
        assert!(rec.has_voted());

        assert!(rec.set_identity(SessionIdentity::new(Some(account(2)), Some(BASE))));
        assert!(!rec.has_voted());
        assert!(rec.view().proposals.is_empty());
        assert!(!rec.connect_prompt_open());
        assert_eq!(rec.voting_weight(), U256::ZERO);
        assert!(!rec.has_right_to_vote());
        assert_eq!(rec.vote_status(), None);
        assert_eq!(rec.delegate_status(), None);

        assert!(!rec.apply_reads(batch(old_epoch, 5, true)));
        assert!(rec.view().proposals.is_empty());
    }

    #[test]
    fn test_same_identity_keeps_state() {
        let mut rec = connected(1);
        rec.apply_reads(batch(rec.epoch(), 1, false));
        assert!(!rec.set_identity(SessionIdentity::new(Some(account(1)), Some(BASE))));
        assert_eq!(rec.view().proposals.len(), 1);
    }

    #[test]
    fn test_successful_settlement_requests_refetch() {
        let mut rec = connected(1);
        rec.apply_reads(batch(rec.epoch(), 1, false));
        let before = rec.view().clone();

        let sub = rec.vote(2).unwrap();
        rec.on_submitted(sub.ticket, Ok(B256::repeat_byte(9)));
        let refetch = rec
            .on_confirmed(sub.ticket, Ok(Confirmation::succeeded()))
            .unwrap();
        assert_eq!(refetch.plan, ReadPlan::after_settlement(Some(account(1))));
        assert_eq!(rec.view(), &before, "snapshot retained until refetch lands");
        assert_eq!(rec.vote_status().as_deref(), Some("Thanks for voting!"));
    }

    #[test]
    fn test_failed_settlement_does_not_refetch() {
        let mut rec = connected(1);
        rec.apply_reads(batch(rec.epoch(), 1, false));
        let sub = rec.vote(0).unwrap();
        rec.on_submitted(sub.ticket, Ok(B256::repeat_byte(9)));
        assert!(rec
            .on_confirmed(
                sub.ticket,
                Ok(Confirmation::failed(RawError::revert_named("AlreadyVoted")))
            )
            .is_none());
        assert_eq!(rec.vote_status().as_deref(), Some("You have already voted!"));
    }

    #[test]
    fn test_in_flight_call_is_dropped_on_identity_change() {
        let mut rec = connected(1);
        rec.apply_reads(batch(rec.epoch(), 1, false));
        let sub = rec.vote(0).unwrap();
        rec.set_identity(SessionIdentity::new(Some(account(2)), Some(BASE)));
        assert!(!rec.coordinator().is_busy());
        assert_eq!(rec.on_submitted(sub.ticket, Ok(B256::repeat_byte(1))), None);
    }

    #[test]
    fn test_gating_helpers() {
        let mut rec = connected(1);
        assert!(!rec.can_vote());
        rec.apply_reads(batch(rec.epoch(), 1, false));
        assert!(rec.can_vote());
        assert!(rec.can_delegate("0xabc"));
        assert!(!rec.can_delegate(""));
        assert!(!rec.can_grant_right(&account(3).to_string()));
    }
}
