//! The remote ballot contract, seen through its fixed read/write interface.
//!
//! Implementations live outside this crate (`ballot-rpc` for a live node,
//! `ballot-nullables` for tests). All calls run on a single-threaded event
//! loop, hence the `?Send` futures.

use async_trait::async_trait;
use ballot_types::{Address, RawProposal, RawVoterRecord, SupportedChain, TxHash, B256};

use crate::classify::RawError;

/// The contract deployment the client talks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ContractTarget {
    pub chain: SupportedChain,
    pub address: Address,
}

/// On-chain outcome of a submitted transaction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Confirmation {
    pub success: bool,
    pub error: Option<RawError>,
}

impl Confirmation {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            error: None,
        }
    }

    pub fn failed(error: RawError) -> Self {
        Self {
            success: false,
            error: Some(error),
        }
    }
}

/// A mutating contract call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContractCall {
    Vote(u64),
    Delegate(Address),
    GiveRightToVote(Address),
}

impl ContractCall {
    /// Solidity function name, for logs.
    pub fn function_name(&self) -> &'static str {
        match self {
            Self::Vote(_) => "vote",
            Self::Delegate(_) => "delegate",
            Self::GiveRightToVote(_) => "giveRightToVote",
        }
    }
}

/// Read side of the contract. `Ok(None)` means the value is absent.
#[async_trait(?Send)]
pub trait BallotReader {
    async fn read_proposal(
        &self,
        target: &ContractTarget,
        index: usize,
    ) -> Result<Option<RawProposal>, RawError>;

    async fn read_voter_record(
        &self,
        target: &ContractTarget,
        voter: Address,
    ) -> Result<Option<RawVoterRecord>, RawError>;

    async fn read_winner_name(&self, target: &ContractTarget) -> Result<Option<B256>, RawError>;

    async fn read_chairperson(&self, target: &ContractTarget)
        -> Result<Option<Address>, RawError>;
}

/// Write side of the contract, reached through the wallet.
#[async_trait(?Send)]
pub trait BallotWriter {
    async fn submit_vote(
        &self,
        target: &ContractTarget,
        from: Address,
        index: u64,
    ) -> Result<TxHash, RawError>;

    async fn submit_delegate(
        &self,
        target: &ContractTarget,
        from: Address,
        to: Address,
    ) -> Result<TxHash, RawError>;

    async fn submit_grant_right(
        &self,
        target: &ContractTarget,
        from: Address,
        voter: Address,
    ) -> Result<TxHash, RawError>;

    async fn await_confirmation(
        &self,
        target: &ContractTarget,
        tx_hash: TxHash,
    ) -> Result<Confirmation, RawError>;
}

/// Dispatch a [`ContractCall`] to the matching writer method.
pub async fn submit<W: BallotWriter + ?Sized>(
    writer: &W,
    target: &ContractTarget,
    from: Address,
    call: ContractCall,
) -> Result<TxHash, RawError> {
    match call {
        ContractCall::Vote(index) => writer.submit_vote(target, from, index).await,
        ContractCall::Delegate(to) => writer.submit_delegate(target, from, to).await,
        ContractCall::GiveRightToVote(voter) => {
            writer.submit_grant_right(target, from, voter).await
        }
    }
}
