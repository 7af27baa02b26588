//! Per-berth mutual exclusion around check-then-write sequences

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::models::BerthNumber;

/// One async mutex per berth number, created on first use.
///
/// Holding the guard serialises every create/update on that berth inside
/// this process. Different berths never wait on each other. Entries nobody
/// holds or waits on are dropped on the next `acquire`, so the table only
/// tracks berths with work in flight.
#[derive(Clone, Default)]
pub struct BerthLocks {
    locks: Arc<Mutex<HashMap<i32, Arc<Mutex<()>>>>>,
}

impl BerthLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, berth: BerthNumber) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            // Only the table holds an idle entry; holders and waiters keep a clone.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            Arc::clone(locks.entry(berth.get()).or_default())
        };
        lock.lock_owned().await
    }

    #[cfg(test)]
    async fn tracked(&self) -> usize {
        self.locks.lock().await.len()
    }
}
