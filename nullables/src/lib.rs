//! Nullable infrastructure for deterministic testing.
//!
//! [`NullBallot`] stands in for the ballot contract and the wallet in front
//! of it. It:
//! - Serves reads from in-memory state
//! - Records every read and call for assertions
//! - Replays scripted wallet and chain outcomes
//! - Never touches the network
//!
//! Usage: hand a `NullBallot` to the core driver in place of the RPC client.

pub mod ballot;

pub use ballot::{NullBallot, ReadKind};
