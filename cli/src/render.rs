//! Plain-text rendering of the ballot snapshot.

use std::fmt::Write;

use ballot_core::Reconciler;
use ballot_types::VoteTarget;
use ballot_utils::{format_votes, short_address};

const CONNECT_PROMPT: &str =
    "Connect a wallet: pass --account or use a node with unlocked accounts.";

/// Render the current snapshot as the lines the CLI prints.
pub fn render(reconciler: &Reconciler) -> String {
    let view = reconciler.view();
    let identity = reconciler.identity();
    let mut out = String::new();

    if let Some(warning) = view.warning() {
        let _ = writeln!(out, "⚠ {warning}");
    }
    match identity.account {
        Some(account) => {
            let _ = writeln!(out, "Account: {}", short_address(&account));
        }
        None => {
            let _ = writeln!(out, "No wallet connected.");
            if reconciler.connect_prompt_open() {
                let _ = writeln!(out, "{CONNECT_PROMPT}");
            }
        }
    }
    if let Some(chain) = view.network.supported() {
        let _ = writeln!(out, "Network: {chain}");
    }
    if !reconciler.reads_enabled() {
        return out;
    }
    if reconciler.is_loading() && view.proposals.is_empty() {
        let _ = writeln!(out, "Loading proposals...");
    }

    let chosen = match view.vote_target() {
        VoteTarget::Proposal(index) => Some(index),
        _ => None,
    };
    if !view.proposals.is_empty() {
        let _ = writeln!(out, "\nProposals:");
    }
    for proposal in &view.proposals {
        let marker = if chosen == Some(proposal.index as u64) {
            " (your vote)"
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "  [{}] {:<32} {:>8} votes{marker}",
            proposal.index,
            proposal.name,
            format_votes(&proposal.vote_count),
        );
    }

    if let Some(leader) = view.leader() {
        let _ = writeln!(out, "\nCurrently leading: {leader}");
    }

    if identity.account.is_some() {
        let _ = writeln!(out);
        match view.vote_target() {
            VoteTarget::Delegated(to) => {
                let _ = writeln!(out, "You delegated your vote to {}.", short_address(&to));
            }
            VoteTarget::Proposal(_) => {
                let _ = writeln!(out, "You have voted.");
            }
            VoteTarget::NotVoted if view.has_right_to_vote() => {
                let _ = writeln!(
                    out,
                    "Voting weight: {}",
                    format_votes(&view.voting_weight())
                );
            }
            VoteTarget::NotVoted => {
                let _ = writeln!(out, "You do not have the right to vote.");
            }
        }
        if view.is_chairperson {
            let _ = writeln!(out, "You are the chairperson.");
        }
    }
    out
}
