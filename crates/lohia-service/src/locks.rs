//! Per-machine lock registry.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

/// Registry of exclusive per-machine locks.
///
/// Every mutating operation acquires the lock of the machine it touches and
/// holds it for the whole read-modify-write, so concurrent requests against
/// the same machine are serialized while requests against different
/// machines proceed independently. There is no global lock.
#[derive(Debug, Default)]
pub struct MachineLocks {
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl MachineLocks {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the exclusive lock for one machine.
    ///
    /// The returned guard keeps the machine serialized until dropped.
    pub async fn acquire(&self, machine_id: Uuid) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(machine_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI64, Ordering};

    #[tokio::test]
    async fn test_same_machine_serializes() {
        let locks = Arc::new(MachineLocks::new());
        let machine_id = Uuid::new_v4();
        let counter = Arc::new(AtomicI64::new(0));

        let mut handles = Vec::new();
        for _ in 0..32 {
            let locks = Arc::clone(&locks);
            let counter = Arc::clone(&counter);
            handles.push(tokio::spawn(async move {
                let _guard = locks.acquire(machine_id).await;
                // non-atomic read-modify-write is safe under the lock
                let value = counter.load(Ordering::SeqCst);
                tokio::task::yield_now().await;
                counter.store(value + 1, Ordering::SeqCst);
            }));
        }
        for handle in handles {
            handle.await.expect("task panicked");
        }
        assert_eq!(counter.load(Ordering::SeqCst), 32);
    }

    #[tokio::test]
    async fn test_different_machines_do_not_block() {
        let locks = MachineLocks::new();
        let guard_a = locks.acquire(Uuid::new_v4()).await;
        // acquiring another machine's lock while holding the first must
        // complete immediately
        let guard_b = locks.acquire(Uuid::new_v4()).await;
        drop(guard_a);
        drop(guard_b);
    }
}
