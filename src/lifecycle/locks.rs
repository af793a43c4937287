/*!
 * Lifecycle Locks
 * Per-application mutual exclusion for launch and terminate
 */

use ahash::RandomState;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per application id
///
/// Held across every suspension point of a launch or terminate, so two
/// operations on the same application never interleave. Different
/// applications proceed independently. Not reentrant: an application hook
/// must not launch or terminate its own application id.
pub struct LifecycleLocks {
    locks: DashMap<String, Arc<Mutex<()>>, RandomState>,
}

impl LifecycleLocks {
    pub fn new() -> Self {
        Self {
            locks: DashMap::with_hasher(RandomState::new()),
        }
    }

    pub async fn acquire(&self, app_id: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .entry(app_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .value()
            .clone();
        lock.lock_owned().await
    }
}

impl Default for LifecycleLocks {
    fn default() -> Self {
        Self::new()
    }
}
