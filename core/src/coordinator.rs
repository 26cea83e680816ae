//! Transaction coordinator: the single-in-flight mutation state machine.
//!
//! ```text
//! Idle ──request──▶ Submitting ──wallet handle──▶ AwaitingChainConfirmation
//!                        │                               │
//!                        └──── rejected ────┐            ├── confirmed ──▶ Settled(Success)
//!                                           ▼            │
//!                                   Settled(Failure) ◀───┘ reverted / failed
//! ```
//!
//! A settled state stays visible until the next accepted request. Requests
//! made while a call is in flight, or whose preconditions fail, are dropped
//! without issuing a call and without surfacing an error; the preconditions
//! are UI affordance guards, the contract does the real validation.

use ballot_types::{parse_address, Address, TxHash};

use crate::classify::{classify, ErrorCategory, RawError};
use crate::contract::{Confirmation, ContractCall, ContractTarget};
use crate::session::SessionIdentity;
use crate::view::ViewModel;

/// The three kinds of mutating action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionKind {
    Vote,
    Delegate,
    GrantRight,
}

impl ActionKind {
    /// Shown while the wallet asks the user to sign.
    pub fn confirming_label(&self) -> &'static str {
        match self {
            Self::Vote => "Confirming vote...",
            Self::Delegate => "Confirm delegation in your wallet...",
            Self::GrantRight => "Confirm in your wallet...",
        }
    }

    /// Shown while the transaction waits for inclusion.
    pub fn pending_label(&self) -> &'static str {
        match self {
            Self::Vote => "Voting...",
            Self::Delegate => "Delegating...",
            Self::GrantRight => "Granting voting right...",
        }
    }

    pub fn success_label(&self) -> &'static str {
        match self {
            Self::Vote => "Thanks for voting!",
            Self::Delegate => "Delegation successful!",
            Self::GrantRight => "Voting right granted!",
        }
    }
}

/// A user request, as entered in the UI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    Vote(u64),
    /// Target address text as typed.
    Delegate(String),
    /// Target address text as typed.
    GrantRight(String),
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Vote(_) => ActionKind::Vote,
            Self::Delegate(_) => ActionKind::Delegate,
            Self::GrantRight(_) => ActionKind::GrantRight,
        }
    }
}

/// What the user is currently doing. Drives wording only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TxIntent {
    #[default]
    None,
    Voting(u64),
    Delegating(Address),
    GrantingRight(Address),
}

impl TxIntent {
    pub fn kind(&self) -> Option<ActionKind> {
        match self {
            Self::None => None,
            Self::Voting(_) => Some(ActionKind::Vote),
            Self::Delegating(_) => Some(ActionKind::Delegate),
            Self::GrantingRight(_) => Some(ActionKind::GrantRight),
        }
    }
}

/// Final outcome of a mutating call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Settlement {
    Success {
        kind: ActionKind,
        tx_hash: TxHash,
    },
    Failure {
        kind: ActionKind,
        error: ErrorCategory,
    },
}

impl Settlement {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Success { kind, .. } | Self::Failure { kind, .. } => *kind,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TxState {
    #[default]
    Idle,
    Submitting,
    AwaitingChainConfirmation {
        tx_hash: TxHash,
    },
    Settled(Settlement),
}

/// Identifies one accepted request. Callbacks carrying a ticket that is no
/// longer active are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ticket(u64);

/// A call the host must issue through the wallet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Submission {
    pub ticket: Ticket,
    pub target: ContractTarget,
    pub from: Address,
    pub call: ContractCall,
}

/// What the coordinator needs to know to check preconditions.
#[derive(Clone, Copy, Debug)]
pub struct ActionContext<'a> {
    pub identity: &'a SessionIdentity,
    /// Contract deployment for the active chain, if any.
    pub target: Option<ContractTarget>,
    pub view: &'a ViewModel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct InFlight {
    ticket: Ticket,
    kind: ActionKind,
}

#[derive(Debug, Default)]
pub struct TransactionCoordinator {
    state: TxState,
    intent: TxIntent,
    delegate_input: String,
    grant_input: String,
    in_flight: Option<InFlight>,
    next_ticket: u64,
}

impl TransactionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &TxState {
        &self.state
    }

    pub fn intent(&self) -> &TxIntent {
        &self.intent
    }

    /// A call is between request and settlement.
    pub fn is_busy(&self) -> bool {
        matches!(
            self.state,
            TxState::Submitting | TxState::AwaitingChainConfirmation { .. }
        )
    }

    pub fn settlement(&self) -> Option<&Settlement> {
        match &self.state {
            TxState::Settled(settlement) => Some(settlement),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ErrorCategory> {
        match &self.state {
            TxState::Settled(Settlement::Failure { error, .. }) => Some(error),
            _ => None,
        }
    }

    // ── Transient input fields ─────────────────────────────────────────

    pub fn delegate_input(&self) -> &str {
        &self.delegate_input
    }

    pub fn set_delegate_input(&mut self, text: impl Into<String>) {
        self.delegate_input = text.into();
    }

    pub fn grant_input(&self) -> &str {
        &self.grant_input
    }

    pub fn set_grant_input(&mut self, text: impl Into<String>) {
        self.grant_input = text.into();
    }

    // ── Transitions ────────────────────────────────────────────────────

    /// Whether `action` would currently be accepted.
    ///
    /// Address text is only checked for emptiness here; malformed text is
    /// accepted and fails at submission.
    pub fn allows(&self, action: &Action, ctx: &ActionContext<'_>) -> bool {
        if self.is_busy() || ctx.identity.account.is_none() || ctx.target.is_none() {
            return false;
        }
        match action {
            Action::Vote(_) => !ctx.view.has_voted() && ctx.view.has_right_to_vote(),
            Action::Delegate(to) => !to.trim().is_empty(),
            Action::GrantRight(to) => ctx.view.is_chairperson && !to.trim().is_empty(),
        }
    }

    /// Accept a user request and return the call to issue.
    ///
    /// Returns `None` when the request is dropped, or when the target address
    /// does not parse (the coordinator then settles as a failure).
    pub fn request(&mut self, action: Action, ctx: &ActionContext<'_>) -> Option<Submission> {
        if !self.allows(&action, ctx) {
            tracing::debug!(
                action = ?action.kind(),
                busy = self.is_busy(),
                "ignoring request, preconditions not met"
            );
            return None;
        }
        let from = ctx.identity.account?;
        let target = ctx.target?;
        let kind = action.kind();

        let (intent, call) = match action {
            Action::Vote(index) => (TxIntent::Voting(index), ContractCall::Vote(index)),
            Action::Delegate(text) => match parse_address(&text) {
                Ok(to) => (TxIntent::Delegating(to), ContractCall::Delegate(to)),
                Err(e) => return self.reject_input(kind, e.to_string()),
            },
            Action::GrantRight(text) => match parse_address(&text) {
                Ok(voter) => (
                    TxIntent::GrantingRight(voter),
                    ContractCall::GiveRightToVote(voter),
                ),
                Err(e) => return self.reject_input(kind, e.to_string()),
            },
        };

        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        self.in_flight = Some(InFlight { ticket, kind });
        self.intent = intent;
        self.state = TxState::Submitting;

        tracing::info!(
            function = call.function_name(),
            chain = %target.chain,
            "submitting transaction"
        );
        Some(Submission {
            ticket,
            target,
            from,
            call,
        })
    }

    /// The wallet answered a submission: a transaction handle, or a refusal.
    ///
    /// Returns the handle to await when the call moved on to chain
    /// confirmation.
    pub fn on_submitted(
        &mut self,
        ticket: Ticket,
        result: Result<TxHash, RawError>,
    ) -> Option<TxHash> {
        if self.state != TxState::Submitting || !self.is_active(ticket) {
            tracing::debug!(?ticket, "ignoring stale submission result");
            return None;
        }
        match result {
            Ok(tx_hash) => {
                tracing::debug!(%tx_hash, "transaction handed to the chain");
                self.state = TxState::AwaitingChainConfirmation { tx_hash };
                Some(tx_hash)
            }
            Err(error) => {
                self.fail(error);
                None
            }
        }
    }

    /// The chain reported the outcome of the awaited transaction.
    pub fn on_confirmed(
        &mut self,
        ticket: Ticket,
        result: Result<Confirmation, RawError>,
    ) -> Option<&Settlement> {
        let tx_hash = match self.state {
            TxState::AwaitingChainConfirmation { tx_hash } if self.is_active(ticket) => tx_hash,
            _ => {
                tracing::debug!(?ticket, "ignoring stale confirmation");
                return None;
            }
        };
        match result {
            Ok(confirmation) if confirmation.success => self.succeed(tx_hash),
            Ok(confirmation) => self.fail(
                confirmation
                    .error
                    .unwrap_or_else(|| RawError::new("Transaction reverted on chain.")),
            ),
            Err(error) => self.fail(error),
        }
        self.settlement()
    }

    /// Forget everything tied to the previous session.
    pub fn reset(&mut self) {
        self.state = TxState::Idle;
        self.intent = TxIntent::None;
        self.delegate_input.clear();
        self.grant_input.clear();
        self.in_flight = None;
    }

    fn is_active(&self, ticket: Ticket) -> bool {
        self.in_flight.is_some_and(|f| f.ticket == ticket)
    }

    fn succeed(&mut self, tx_hash: TxHash) {
        let Some(InFlight { kind, .. }) = self.in_flight.take() else {
            return;
        };
        match kind {
            ActionKind::Delegate => self.delegate_input.clear(),
            ActionKind::GrantRight => self.grant_input.clear(),
            ActionKind::Vote => {}
        }
        self.intent = TxIntent::None;
        self.state = TxState::Settled(Settlement::Success { kind, tx_hash });
        tracing::info!(?kind, %tx_hash, "transaction settled");
    }

    /// Settle as a failure. The intent stays for labelling.
    fn fail(&mut self, error: RawError) {
        let Some(InFlight { kind, .. }) = self.in_flight.take() else {
            return;
        };
        let category = classify(&error);
        tracing::warn!(?kind, %error, "transaction failed");
        self.state = TxState::Settled(Settlement::Failure {
            kind,
            error: category,
        });
    }

    fn reject_input(&mut self, kind: ActionKind, detail: String) -> Option<Submission> {
        tracing::debug!(?kind, %detail, "rejecting malformed target address");
        self.in_flight = None;
        // A target that does not parse names no intent. Any earlier one is stale.
        self.intent = TxIntent::None;
        self.state = TxState::Settled(Settlement::Failure {
            kind,
            error: classify(&RawError::new(detail).with_name("InvalidAddressError")),
        });
        None
    }

    // ── Wording ────────────────────────────────────────────────────────

    /// Status line for one kind of action, if the current state concerns it.
    pub fn status(&self, kind: ActionKind) -> Option<String> {
        let (current, text) = match &self.state {
            TxState::Idle => return None,
            TxState::Submitting => {
                let current = self.in_flight?.kind;
                (current, current.confirming_label().to_string())
            }
            TxState::AwaitingChainConfirmation { .. } => {
                let current = self.in_flight?.kind;
                (current, current.pending_label().to_string())
            }
            TxState::Settled(Settlement::Success { kind, .. }) => {
                (*kind, kind.success_label().to_string())
            }
            TxState::Settled(Settlement::Failure { kind, error }) => (*kind, error.to_string()),
        };
        (current == kind).then_some(text)
    }

    pub fn vote_status(&self) -> Option<String> {
        self.status(ActionKind::Vote)
    }

    pub fn delegate_status(&self) -> Option<String> {
        self.status(ActionKind::Delegate)
    }

    pub fn grant_status(&self) -> Option<String> {
        self.status(ActionKind::GrantRight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{GENERIC_FAILURE, USER_DECLINED};
    use ballot_types::{SupportedChain, VoterRecord, B256, U256};

    fn account() -> Address {
        Address::repeat_byte(0x11)
    }

    fn target() -> ContractTarget {
        ContractTarget {
            chain: SupportedChain::Base,
            address: Address::repeat_byte(0xCC),
        }
    }

    fn identity() -> SessionIdentity {
        SessionIdentity::new(Some(account()), Some(8453))
    }

    fn view(weight: u64, has_voted: bool, is_chairperson: bool) -> ViewModel {
        ViewModel {
            voter: Some(VoterRecord {
                weight: U256::from(weight),
                has_voted,
                delegate: None,
                chosen_proposal_index: None,
            }),
            is_chairperson,
            ..ViewModel::default()
        }
    }

    fn ctx<'a>(identity: &'a SessionIdentity, view: &'a ViewModel) -> ActionContext<'a> {
        ActionContext {
            identity,
            target: Some(target()),
            view,
        }
    }

    fn hash(byte: u8) -> TxHash {
        B256::repeat_byte(byte)
    }

    #[test]
    fn test_vote_happy_path() {
        let id = identity();
        let v = view(1, false, false);
        let mut coord = TransactionCoordinator::new();

        let sub = coord.request(Action::Vote(2), &ctx(&id, &v)).unwrap();
        assert_eq!(sub.call, ContractCall::Vote(2));
        assert_eq!(sub.from, account());
        assert_eq!(coord.state(), &TxState::Submitting);
        assert_eq!(coord.intent(), &TxIntent::Voting(2));
        assert_eq!(coord.vote_status().as_deref(), Some("Confirming vote..."));

        assert_eq!(coord.on_submitted(sub.ticket, Ok(hash(1))), Some(hash(1)));
        assert_eq!(
            coord.state(),
            &TxState::AwaitingChainConfirmation { tx_hash: hash(1) }
        );
        assert_eq!(coord.vote_status().as_deref(), Some("Voting..."));

        let settled = coord
            .on_confirmed(sub.ticket, Ok(Confirmation::succeeded()))
            .cloned()
            .unwrap();
        assert!(settled.is_success());
        assert_eq!(coord.intent(), &TxIntent::None);
        assert_eq!(coord.vote_status().as_deref(), Some("Thanks for voting!"));
        assert_eq!(coord.delegate_status(), None);
    }

    #[test]
    fn test_vote_without_weight_is_noop() {
        let id = identity();
        let v = view(0, false, false);
        let mut coord = TransactionCoordinator::new();
        assert!(coord.request(Action::Vote(0), &ctx(&id, &v)).is_none());
        assert_eq!(coord.state(), &TxState::Idle);
        assert_eq!(coord.intent(), &TxIntent::None);
    }

    #[test]
    fn test_vote_after_voting_is_noop() {
        let id = identity();
        let v = view(1, true, false);
        let mut coord = TransactionCoordinator::new();
        assert!(coord.request(Action::Vote(0), &ctx(&id, &v)).is_none());
        assert_eq!(coord.state(), &TxState::Idle);
    }

    #[test]
    fn test_vote_without_voter_record_is_noop() {
        let id = identity();
        let v = ViewModel::default();
        let mut coord = TransactionCoordinator::new();
        assert!(coord.request(Action::Vote(0), &ctx(&id, &v)).is_none());
    }

    #[test]
    fn test_requires_account_and_contract() {
        let v = view(1, false, false);
        let mut coord = TransactionCoordinator::new();

        let anonymous = SessionIdentity::new(None, Some(8453));
        assert!(coord.request(Action::Vote(0), &ctx(&anonymous, &v)).is_none());

        let id = identity();
        let no_contract = ActionContext {
            identity: &id,
            target: None,
            view: &v,
        };
        assert!(coord.request(Action::Vote(0), &no_contract).is_none());
        assert_eq!(coord.state(), &TxState::Idle);
    }

    #[test]
    fn test_second_request_while_in_flight_is_ignored() {
        let id = identity();
        let v = view(1, false, true);
        let mut coord = TransactionCoordinator::new();
        let sub = coord.request(Action::Vote(1), &ctx(&id, &v)).unwrap();

        let other = format!("{}", Address::repeat_byte(0x22));
        assert!(coord
            .request(Action::Delegate(other.clone()), &ctx(&id, &v))
            .is_none());
        assert_eq!(coord.state(), &TxState::Submitting);
        assert_eq!(coord.intent(), &TxIntent::Voting(1));

        coord.on_submitted(sub.ticket, Ok(hash(3)));
        assert!(coord
            .request(Action::GrantRight(other), &ctx(&id, &v))
            .is_none());
        assert_eq!(
            coord.state(),
            &TxState::AwaitingChainConfirmation { tx_hash: hash(3) }
        );
        assert_eq!(coord.intent(), &TxIntent::Voting(1));
    }

    #[test]
    fn test_user_rejection_settles_failure_and_keeps_intent() {
        let id = identity();
        let v = view(1, false, false);
        let mut coord = TransactionCoordinator::new();
        let sub = coord.request(Action::Vote(3), &ctx(&id, &v)).unwrap();

        assert_eq!(coord.on_submitted(sub.ticket, Err(RawError::user_rejected())), None);
        assert_eq!(coord.error(), Some(&ErrorCategory::UserDeclined));
        assert_eq!(coord.intent(), &TxIntent::Voting(3));
        assert_eq!(coord.vote_status().as_deref(), Some(USER_DECLINED));
    }

    #[test]
    fn test_revert_on_chain_settles_failure() {
        let id = identity();
        let v = view(1, false, false);
        let mut coord = TransactionCoordinator::new();
        let sub = coord.request(Action::Vote(0), &ctx(&id, &v)).unwrap();
        coord.on_submitted(sub.ticket, Ok(hash(4)));

        let settled = coord
            .on_confirmed(
                sub.ticket,
                Ok(Confirmation::failed(RawError::revert_reason("Already voted."))),
            )
            .cloned()
            .unwrap();
        assert_eq!(
            settled,
            Settlement::Failure {
                kind: ActionKind::Vote,
                error: ErrorCategory::ContractRevertWithReason("Already voted.".into()),
            }
        );
    }

    #[test]
    fn test_unsuccessful_confirmation_without_error() {
        let id = identity();
        let v = view(1, false, false);
        let mut coord = TransactionCoordinator::new();
        let sub = coord.request(Action::Vote(0), &ctx(&id, &v)).unwrap();
        coord.on_submitted(sub.ticket, Ok(hash(4)));
        coord.on_confirmed(
            sub.ticket,
            Ok(Confirmation {
                success: false,
                error: None,
            }),
        );
        assert!(matches!(
            coord.error(),
            Some(ErrorCategory::UnclassifiedShort(_))
        ));
    }

    #[test]
    fn test_failure_persists_until_next_accepted_request() {
        let id = identity();
        let v = view(1, false, false);
        let mut coord = TransactionCoordinator::new();
        let sub = coord.request(Action::Vote(0), &ctx(&id, &v)).unwrap();
        coord.on_submitted(sub.ticket, Err(RawError::new("x".repeat(150))));
        assert_eq!(coord.vote_status().as_deref(), Some(GENERIC_FAILURE));

        // A dropped request leaves the failure on display.
        let voted = view(1, true, false);
        assert!(coord.request(Action::Vote(0), &ctx(&id, &voted)).is_none());
        assert_eq!(coord.error(), Some(&ErrorCategory::UnclassifiedLong));

        // An accepted one replaces it.
        assert!(coord.request(Action::Vote(1), &ctx(&id, &v)).is_some());
        assert_eq!(coord.error(), None);
        assert_eq!(coord.state(), &TxState::Submitting);
    }

    #[test]
    fn test_delegate_clears_input_on_success() {
        let id = identity();
        let v = view(1, false, false);
        let mut coord = TransactionCoordinator::new();
        let to = Address::repeat_byte(0x33);
        coord.set_delegate_input(to.to_string());

        let sub = coord
            .request(Action::Delegate(coord.delegate_input().to_string()), &ctx(&id, &v))
            .unwrap();
        assert_eq!(sub.call, ContractCall::Delegate(to));
        assert_eq!(coord.intent(), &TxIntent::Delegating(to));
        assert_eq!(
            coord.delegate_status().as_deref(),
            Some("Confirm delegation in your wallet...")
        );

        coord.on_submitted(sub.ticket, Ok(hash(5)));
        assert_eq!(coord.delegate_status().as_deref(), Some("Delegating..."));
        coord.on_confirmed(sub.ticket, Ok(Confirmation::succeeded()));
        assert_eq!(coord.delegate_input(), "");
        assert_eq!(
            coord.delegate_status().as_deref(),
            Some("Delegation successful!")
        );
        assert_eq!(coord.vote_status(), None);
    }

    #[test]
    fn test_delegate_failure_keeps_input() {
        let id = identity();
        let v = view(1, false, false);
        let mut coord = TransactionCoordinator::new();
        let to = Address::repeat_byte(0x33).to_string();
        coord.set_delegate_input(to.clone());
        let sub = coord.request(Action::Delegate(to.clone()), &ctx(&id, &v)).unwrap();
        coord.on_submitted(sub.ticket, Err(RawError::user_rejected()));
        assert_eq!(coord.delegate_input(), to);
    }

    #[test]
    fn test_delegate_empty_target_is_noop() {
        let id = identity();
        let v = view(1, false, false);
        let mut coord = TransactionCoordinator::new();
        assert!(coord
            .request(Action::Delegate("   ".into()), &ctx(&id, &v))
            .is_none());
        assert_eq!(coord.state(), &TxState::Idle);
    }

    #[test]
    fn test_delegate_malformed_target_fails_without_call() {
        let id = identity();
        let v = view(1, false, false);
        let mut coord = TransactionCoordinator::new();
        let sub = coord.request(Action::Vote(3), &ctx(&id, &v)).unwrap();
        coord.on_submitted(sub.ticket, Err(RawError::user_rejected()));
        assert_eq!(coord.intent(), &TxIntent::Voting(3));

        assert!(coord
            .request(Action::Delegate("0xnope".into()), &ctx(&id, &v))
            .is_none());
        let settlement = coord.settlement().unwrap();
        assert_eq!(settlement.kind(), ActionKind::Delegate);
        assert!(!settlement.is_success());
        assert_eq!(coord.intent(), &TxIntent::None);
        assert!(coord.delegate_status().is_some());
        assert_eq!(coord.vote_status(), None);
        assert!(!coord.is_busy());
    }

    #[test]
    fn test_grant_right_requires_chairperson() {
        let id = identity();
        let voter = Address::repeat_byte(0x44).to_string();
        let mut coord = TransactionCoordinator::new();

        let not_chair = view(1, false, false);
        assert!(coord
            .request(Action::GrantRight(voter.clone()), &ctx(&id, &not_chair))
            .is_none());
        assert_eq!(coord.state(), &TxState::Idle);

        let chair = view(1, false, true);
        let sub = coord
            .request(Action::GrantRight(voter), &ctx(&id, &chair))
            .unwrap();
        assert_eq!(
            sub.call,
            ContractCall::GiveRightToVote(Address::repeat_byte(0x44))
        );
        assert_eq!(coord.grant_status().as_deref(), Some("Confirm in your wallet..."));
    }

    #[test]
    fn test_grant_right_clears_input_on_success() {
        let id = identity();
        let chair = view(0, false, true);
        let mut coord = TransactionCoordinator::new();
        let voter = Address::repeat_byte(0x44).to_string();
        coord.set_grant_input(voter.clone());
        coord.set_delegate_input("untouched");

        let sub = coord.request(Action::GrantRight(voter), &ctx(&id, &chair)).unwrap();
        coord.on_submitted(sub.ticket, Ok(hash(6)));
        coord.on_confirmed(sub.ticket, Ok(Confirmation::succeeded()));
        assert_eq!(coord.grant_input(), "");
        assert_eq!(coord.delegate_input(), "untouched");
        assert_eq!(coord.grant_status().as_deref(), Some("Voting right granted!"));
    }

    #[test]
    fn test_stale_callbacks_are_ignored() {
        let id = identity();
        let v = view(1, false, false);
        let mut coord = TransactionCoordinator::new();
        let sub = coord.request(Action::Vote(0), &ctx(&id, &v)).unwrap();
        coord.reset();

        assert_eq!(coord.on_submitted(sub.ticket, Ok(hash(7))), None);
        assert!(coord
            .on_confirmed(sub.ticket, Ok(Confirmation::succeeded()))
            .is_none());
        assert_eq!(coord.state(), &TxState::Idle);
    }

    #[test]
    fn test_confirmation_before_submission_is_ignored() {
        let id = identity();
        let v = view(1, false, false);
        let mut coord = TransactionCoordinator::new();
        let sub = coord.request(Action::Vote(0), &ctx(&id, &v)).unwrap();
        assert!(coord
            .on_confirmed(sub.ticket, Ok(Confirmation::succeeded()))
            .is_none());
        assert_eq!(coord.state(), &TxState::Submitting);
    }

    #[test]
    fn test_reset_clears_everything() {
        let id = identity();
        let v = view(1, false, false);
        let mut coord = TransactionCoordinator::new();
        coord.set_delegate_input("abc");
        coord.set_grant_input("def");
        coord.request(Action::Vote(0), &ctx(&id, &v));
        coord.reset();
        assert_eq!(coord.state(), &TxState::Idle);
        assert_eq!(coord.intent(), &TxIntent::None);
        assert_eq!(coord.delegate_input(), "");
        assert_eq!(coord.grant_input(), "");
        assert_eq!(coord.vote_status(), None);
    }

    #[test]
    fn test_allows_gates_affordances() {
        let id = identity();
        let v = view(1, false, false);
        let coord = TransactionCoordinator::new();
        assert!(coord.allows(&Action::Vote(0), &ctx(&id, &v)));
        assert!(!coord.allows(&Action::GrantRight("0x1".into()), &ctx(&id, &v)));
        assert!(!coord.allows(&Action::Delegate(String::new()), &ctx(&id, &v)));
    }
}
