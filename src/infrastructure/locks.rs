//! Per-train serialization of schedule writes.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of one async mutex per train id.
///
/// Every check-then-write on a train's stops runs while holding that
/// train's guard, so two writers cannot both validate against the same
/// sibling set.
#[derive(Debug, Default)]
pub struct TrainLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

impl TrainLocks {
    pub fn new() -> Self {
        Self::default()
    }

    fn entry(&self, train_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .entry(train_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    pub async fn acquire(&self, train_id: &str) -> OwnedMutexGuard<()> {
        self.entry(train_id).lock_owned().await
    }

    /// Lock several trains at once, always in sorted id order.
    pub async fn acquire_many(&self, train_ids: &[&str]) -> Vec<OwnedMutexGuard<()>> {
        let mut ids = train_ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        let mut guards = Vec::with_capacity(ids.len());
        for id in ids {
            guards.push(self.acquire(id).await);
        }
        guards
    }

    /// Drop the entry of a deleted train.
    pub fn forget(&self, train_id: &str) {
        self.locks.remove(train_id);
    }

    pub fn len(&self) -> usize {
        self.locks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}
