//! Read planning and concurrent execution.
//!
//! Reads are issued together and resolve independently; none waits for
//! another. A read that fails is left out of the batch so the slot keeps its
//! previous value. Retry and caching belong to the read collaborator.

use ballot_types::{Address, PROPOSAL_SLOTS};
use futures_util::future::{join_all, FutureExt, LocalBoxFuture};

use crate::assembler::ReadOutcome;
use crate::classify::RawError;
use crate::contract::{BallotReader, ContractTarget};
use crate::session::Epoch;

/// Which reads to issue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadPlan {
    pub proposal_slots: Vec<usize>,
    pub winner: bool,
    /// Voter record to read, if an account is active.
    pub voter: Option<Address>,
    pub chairperson: bool,
}

impl ReadPlan {
    /// Everything the view needs when a session starts.
    pub fn full(account: Option<Address>) -> Self {
        Self {
            proposal_slots: (0..PROPOSAL_SLOTS).collect(),
            winner: true,
            voter: account,
            chairperson: true,
        }
    }

    /// What a successful mutation can have changed: every tally, the leader,
    /// and the acting account's record.
    pub fn after_settlement(account: Option<Address>) -> Self {
        Self {
            chairperson: false,
            ..Self::full(account)
        }
    }

    pub fn len(&self) -> usize {
        self.proposal_slots.len()
            + usize::from(self.winner)
            + usize::from(self.voter.is_some())
            + usize::from(self.chairperson)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A plan bound to a contract and to the session it was made for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadRequest {
    pub epoch: Epoch,
    pub target: ContractTarget,
    pub plan: ReadPlan,
}

/// Results of one executed request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReadBatch {
    pub epoch: Epoch,
    pub outcomes: Vec<ReadOutcome>,
    pub failed: usize,
}

pub struct RefetchOrchestrator;

impl RefetchOrchestrator {
    /// Issue every read in the request concurrently and collect the results.
    pub async fn execute<R: BallotReader + ?Sized>(reader: &R, request: &ReadRequest) -> ReadBatch {
        let target = &request.target;
        let plan = &request.plan;
        let mut reads: Vec<LocalBoxFuture<'_, (&'static str, Result<ReadOutcome, RawError>)>> =
            Vec::with_capacity(plan.len());

        for &index in &plan.proposal_slots {
            reads.push(
                async move {
                    let result = reader.read_proposal(target, index).await;
                    ("proposal", result.map(|raw| ReadOutcome::Proposal(index, raw)))
                }
                .boxed_local(),
            );
        }
        if plan.winner {
            reads.push(
                async move {
                    let result = reader.read_winner_name(target).await;
                    ("winner", result.map(ReadOutcome::Winner))
                }
                .boxed_local(),
            );
        }
        if let Some(voter) = plan.voter {
            reads.push(
                async move {
                    let result = reader.read_voter_record(target, voter).await;
                    ("voter", result.map(ReadOutcome::Voter))
                }
                .boxed_local(),
            );
        }
        if plan.chairperson {
            reads.push(
                async move {
                    let result = reader.read_chairperson(target).await;
                    ("chairperson", result.map(ReadOutcome::Chairperson))
                }
                .boxed_local(),
            );
        }

        let mut outcomes = Vec::with_capacity(reads.len());
        let mut failed = 0;
        for (read, result) in join_all(reads).await {
            match result {
                Ok(outcome) => outcomes.push(outcome),
                Err(e) => {
                    failed += 1;
                    tracing::debug!(read, error = %e, "read failed, keeping previous value");
                }
            }
        }

        tracing::debug!(
            epoch = request.epoch,
            resolved = outcomes.len(),
            failed,
            "read batch complete"
        );
        ReadBatch {
            epoch: request.epoch,
            outcomes,
            failed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_plan() {
        let account = Address::repeat_byte(1);
        let plan = ReadPlan::full(Some(account));
        assert_eq!(plan.proposal_slots, vec![0, 1, 2, 3]);
        assert!(plan.winner);
        assert!(plan.chairperson);
        assert_eq!(plan.voter, Some(account));
        assert_eq!(plan.len(), 7);
    }

    #[test]
    fn test_plan_without_account() {
        let plan = ReadPlan::full(None);
        assert_eq!(plan.voter, None);
        assert_eq!(plan.len(), 6);
        assert!(!plan.is_empty());
    }

    #[test]
    fn test_after_settlement_plan() {
        let account = Address::repeat_byte(1);
        let plan = ReadPlan::after_settlement(Some(account));
        assert_eq!(plan.proposal_slots, vec![0, 1, 2, 3]);
        assert!(plan.winner);
        assert!(!plan.chairperson);
        assert_eq!(plan.voter, Some(account));
    }
}
