//! Optimistic mutation with rollback.
//!
//! A mutation is applied under the lock together with a clone of the value
//! taken just before it; the remote effect then runs with the lock released.
//! Every mutation bumps a version. If the effect fails and nothing else
//! touched the value in the meantime, the clone replaces it wholesale;
//! otherwise a caller-supplied partial restore puts back only what the failed
//! mutation owned.

use std::future::Future;
use std::sync::{Mutex, MutexGuard};

/// Value captured immediately before an optimistic mutation.
#[derive(Debug)]
#[must_use = "a snapshot must be reconciled"]
pub struct Snapshot<T> {
    before: T,
    /// Version right after the optimistic mutation.
    version: u64,
}

#[derive(Debug, Default)]
struct Versioned<T> {
    value: T,
    version: u64,
}

/// A value that supports optimistic, rollback-able mutation.
#[derive(Debug, Default)]
pub struct OptimisticCell<T> {
    inner: Mutex<Versioned<T>>,
}

impl<T: Clone> OptimisticCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(Versioned { value, version: 0 }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Versioned<T>> {
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("Optimistic cell lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Clones the current value.
    pub fn get(&self) -> T {
        self.lock().value.clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.lock().value)
    }

    /// Mutates in place without taking a snapshot.
    pub fn update<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        let mut guard = self.lock();
        guard.version += 1;
        f(&mut guard.value)
    }

    pub fn replace(&self, value: T) -> T {
        let mut guard = self.lock();
        guard.version += 1;
        std::mem::replace(&mut guard.value, value)
    }

    /// Runs `mutate` under the lock after cloning the current value.
    ///
    /// On `Err` the value is put back untouched and no snapshot is returned,
    /// so validation and mutation can share one lock acquisition.
    pub fn try_apply<R, E>(
        &self,
        mutate: impl FnOnce(&mut T) -> Result<R, E>,
    ) -> Result<(R, Snapshot<T>), E> {
        let mut guard = self.lock();
        let before = guard.value.clone();
        match mutate(&mut guard.value) {
            Ok(r) => {
                guard.version += 1;
                let version = guard.version;
                Ok((r, Snapshot { before, version }))
            }
            Err(e) => {
                guard.value = before;
                Err(e)
            }
        }
    }

    /// Awaits `effect`; on success drops `snapshot`, on failure rolls back.
    ///
    /// Rollback restores the whole snapshot when the value is unchanged since
    /// the optimistic mutation. If anything else has mutated it since,
    /// `restore_own(current, before)` is called instead and must undo only
    /// this mutation's part.
    pub async fn reconcile<R, E, Fut>(
        &self,
        snapshot: Snapshot<T>,
        effect: Fut,
        restore_own: impl FnOnce(&mut T, T),
    ) -> Result<R, E>
    where
        Fut: Future<Output = Result<R, E>>,
    {
        match effect.await {
            Ok(r) => Ok(r),
            Err(e) => {
                let mut guard = self.lock();
                if guard.version == snapshot.version {
                    guard.value = snapshot.before;
                } else {
                    restore_own(&mut guard.value, snapshot.before);
                }
                guard.version += 1;
                Err(e)
            }
        }
    }
}
