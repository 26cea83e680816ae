//! Session identity tracking.
//!
//! The pair `(account, chain_id)` scopes every piece of derived state. Each
//! time the pair changes by value the guard moves to a new epoch; anything
//! tagged with an older epoch (a read batch, an in-flight transaction) is
//! stale and must be dropped instead of applied.

use ballot_types::{Address, ChainId, NetworkStatus};

/// Monotonic session counter.
pub type Epoch = u64;

/// The wallet's active account and chain.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct SessionIdentity {
    pub account: Option<Address>,
    pub chain_id: Option<ChainId>,
}

impl SessionIdentity {
    pub fn new(account: Option<Address>, chain_id: Option<ChainId>) -> Self {
        Self { account, chain_id }
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    pub fn network(&self) -> NetworkStatus {
        NetworkStatus::from_chain_id(self.chain_id)
    }
}

/// A detected identity change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionChange {
    pub previous: SessionIdentity,
    pub current: SessionIdentity,
    pub epoch: Epoch,
}

/// Tracks the current identity and its epoch.
#[derive(Clone, Debug, Default)]
pub struct SessionGuard {
    identity: SessionIdentity,
    epoch: Epoch,
}

impl SessionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identity(&self) -> &SessionIdentity {
        &self.identity
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    /// Record the identity reported by the wallet.
    ///
    /// Returns the change when the pair differs from the current one. Reporting
    /// the same pair again is not a change.
    pub fn observe(&mut self, next: SessionIdentity) -> Option<SessionChange> {
        if next == self.identity {
            return None;
        }
        let previous = std::mem::replace(&mut self.identity, next);
        self.epoch += 1;
        Some(SessionChange {
            previous,
            current: next,
            epoch: self.epoch,
        })
    }

    /// Whether work tagged with `epoch` still belongs to the current session.
    pub fn is_current(&self, epoch: Epoch) -> bool {
        epoch == self.epoch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(byte: u8, chain: ChainId) -> SessionIdentity {
        SessionIdentity::new(Some(Address::repeat_byte(byte)), Some(chain))
    }

    #[test]
    fn test_same_identity_is_not_a_change() {
        let mut guard = SessionGuard::new();
        assert!(guard.observe(identity(1, 8453)).is_some());
        assert!(guard.observe(identity(1, 8453)).is_none());
        assert_eq!(guard.epoch(), 1);
    }

    #[test]
    fn test_account_change_bumps_epoch() {
        let mut guard = SessionGuard::new();
        guard.observe(identity(1, 8453));
        let change = guard.observe(identity(2, 8453)).unwrap();
        assert_eq!(change.previous, identity(1, 8453));
        assert_eq!(change.current, identity(2, 8453));
        assert_eq!(change.epoch, 2);
        assert!(guard.is_current(2));
        assert!(!guard.is_current(1));
    }

    #[test]
    fn test_chain_change_bumps_epoch() {
        let mut guard = SessionGuard::new();
        guard.observe(identity(1, 8453));
        assert!(guard.observe(identity(1, 42220)).is_some());
        assert_eq!(guard.epoch(), 2);
    }

    #[test]
    fn test_disconnect_is_a_change() {
        let mut guard = SessionGuard::new();
        guard.observe(identity(1, 8453));
        let change = guard.observe(SessionIdentity::default()).unwrap();
        assert!(!change.current.is_connected());
        assert_eq!(change.current.network(), NetworkStatus::Disconnected);
    }
}
