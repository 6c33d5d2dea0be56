//! Per-account submission serialization.

use alloy::primitives::Address;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async lock per sending account.
///
/// Holding the guard keeps other submissions from the same account waiting;
/// different accounts never block each other. Locks nobody holds or waits
/// on are dropped on the next [`acquire`](Self::acquire).
#[derive(Debug, Default)]
pub struct SubmissionQueue {
    locks: DashMap<Address, Arc<Mutex<()>>>,
}

impl SubmissionQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for this account's turn.
    pub async fn acquire(&self, account: Address) -> OwnedMutexGuard<()> {
        self.locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        let lock = self.locks.entry(account).or_default().clone();
        lock.lock_owned().await
    }

    /// Number of accounts with a live lock.
    pub fn accounts(&self) -> usize {
        self.locks.len()
    }
}
