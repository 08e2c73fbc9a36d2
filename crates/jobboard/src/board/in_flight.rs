//! Per-record guard against overlapping moves.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

/// Ids of records with a move awaiting its remote result.
#[derive(Debug, Clone, Default)]
pub struct InFlight {
    ids: Arc<Mutex<HashSet<String>>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        match self.ids.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                log::warn!("In-flight set lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    /// Marks `id` busy. Returns `None` when a move on `id` is already pending.
    pub fn try_claim(&self, id: &str) -> Option<InFlightGuard> {
        if !self.lock().insert(id.to_string()) {
            return None;
        }
        Some(InFlightGuard {
            ids: Arc::clone(&self.ids),
            id: id.to_string(),
        })
    }

    pub fn is_busy(&self, id: &str) -> bool {
        self.lock().contains(id)
    }
}

/// Releases the claimed id on drop.
#[derive(Debug)]
pub struct InFlightGuard {
    ids: Arc<Mutex<HashSet<String>>>,
    id: String,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        let mut ids = match self.ids.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        ids.remove(&self.id);
    }
}
