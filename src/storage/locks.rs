//! Per-user critical sections.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{Mutex, OwnedMutexGuard};

/// Registry of per-user async locks.
///
/// A read-check-write sequence on one user's record must not interleave with
/// another sequence for the same user; sequences for different users may run
/// concurrently. Lock entries are never removed, matching the record
/// lifecycle (records are created lazily and never deleted).
#[derive(Debug, Default)]
pub struct KeyLocks {
    inner: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    /// Creates an empty lock registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for one user, creating it on first use.
    pub async fn acquire(&self, user_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            Arc::clone(map.entry(user_id).or_default())
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_same_key_is_exclusive() {
        let locks = Arc::new(KeyLocks::new());
        let guard = locks.acquire(1).await;

        let contender = {
            let locks = Arc::clone(&locks);
            tokio::spawn(async move {
                locks.acquire(1).await;
            })
        };

        // The second acquire must not complete while the guard is held.
        tokio::task::yield_now().await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap();
    }

    #[tokio::test]
    async fn test_different_keys_do_not_block() {
        let locks = KeyLocks::new();
        let _one = locks.acquire(1).await;
        let _two = locks.acquire(2).await;
    }
}
