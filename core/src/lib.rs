//! Client core for the on-chain ballot.
//!
//! Pure state machines plus a thin async driver:
//!
//! - [`Reconciler`] owns the session, the raw reads, and the published
//!   [`ViewModel`].
//! - [`TransactionCoordinator`] runs one mutating call at a time.
//! - [`classify`] turns raw collaborator errors into user-facing sentences.
//!
//! Contract access goes through the [`BallotReader`] / [`BallotWriter`]
//! traits so the core never touches the network.

pub mod assembler;
pub mod classify;
pub mod config;
pub mod contract;
pub mod coordinator;
pub mod driver;
pub mod error;
pub mod reconciler;
pub mod refetch;
pub mod session;
pub mod view;

pub use assembler::{assemble, RawReads, ReadOutcome, ReadState};
pub use classify::{classify, user_message, ErrorCategory, RawError, Revert};
pub use config::{ClientConfig, ContractAddresses, RpcEndpoints};
pub use contract::{
    submit, BallotReader, BallotWriter, Confirmation, ContractCall, ContractTarget,
};
pub use coordinator::{
    Action, ActionContext, ActionKind, Settlement, Submission, Ticket, TransactionCoordinator,
    TxIntent, TxState,
};
pub use error::CoreError;
pub use reconciler::Reconciler;
pub use refetch::{ReadBatch, ReadPlan, ReadRequest, RefetchOrchestrator};
pub use session::{Epoch, SessionChange, SessionGuard, SessionIdentity};
pub use view::ViewModel;
