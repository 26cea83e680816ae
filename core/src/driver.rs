//! Async glue between the [`Reconciler`] and the contract collaborators.
//!
//! The reconciler lives in a `RefCell` on a single-threaded loop. Borrows are
//! taken only between awaits; every await runs with the cell released so that
//! identity changes arriving mid-flight are applied immediately and the
//! stale result is discarded when it lands.

use std::cell::RefCell;

use crate::contract::{self, BallotReader, BallotWriter};
use crate::coordinator::{Action, Settlement};
use crate::reconciler::Reconciler;
use crate::refetch::{ReadRequest, RefetchOrchestrator};

/// Issue the full read set for the current session and apply it.
///
/// Returns whether the batch was applied.
pub async fn refresh<R>(reconciler: &RefCell<Reconciler>, reader: &R) -> bool
where
    R: BallotReader + ?Sized,
{
    let Some(request) = reconciler.borrow().initial_reads() else {
        tracing::debug!("reads disabled for the current session");
        return false;
    };
    run_reads(reconciler, reader, request).await
}

async fn run_reads<R>(reconciler: &RefCell<Reconciler>, reader: &R, request: ReadRequest) -> bool
where
    R: BallotReader + ?Sized,
{
    let batch = RefetchOrchestrator::execute(reader, &request).await;
    reconciler.borrow_mut().apply_reads(batch)
}

/// Run one user action to settlement, then refetch on success.
///
/// Returns the settlement, or `None` if the request was dropped or the
/// session changed before the call settled.
pub async fn perform<C>(
    reconciler: &RefCell<Reconciler>,
    contract: &C,
    action: Action,
) -> Option<Settlement>
where
    C: BallotReader + BallotWriter + ?Sized,
{
    if !reconciler.borrow().allows(&action) {
        tracing::debug!(action = ?action.kind(), "action not available");
        return None;
    }
    let submission = reconciler.borrow_mut().request(action);
    let Some(submission) = submission else {
        // Accepted but unparseable: the coordinator settled it as a failure.
        return reconciler.borrow().settlement().cloned();
    };

    let sent = contract::submit(
        contract,
        &submission.target,
        submission.from,
        submission.call,
    )
    .await;
    let tx_hash = reconciler
        .borrow_mut()
        .on_submitted(submission.ticket, sent);
    let Some(tx_hash) = tx_hash else {
        return reconciler.borrow().settlement().cloned();
    };

    let confirmation = contract
        .await_confirmation(&submission.target, tx_hash)
        .await;
    let refetch = reconciler
        .borrow_mut()
        .on_confirmed(submission.ticket, confirmation);
    let settlement = reconciler.borrow().settlement().cloned();

    if let Some(request) = refetch {
        run_reads(reconciler, contract, request).await;
    }
    settlement
}
