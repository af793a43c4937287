/*!
 * In-Memory Window Manager
 * Headless window manager keeping surfaces in a map
 */

use super::traits::{SurfaceHandle, WindowFuture, WindowManager};
use crate::core::errors::{WindowError, WindowResult};
use crate::core::types::WindowId;
use crate::process::AppInstance;
use ahash::RandomState;
use dashmap::{DashMap, DashSet};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::debug;

struct SurfaceRecord {
    handle: SurfaceHandle,
    instance: Arc<AppInstance>,
}

/// Surfaces live in a map; creation and closure yield once to the executor
/// so they behave like real suspension points.
///
/// Failures can be injected per window (`fail_close`) or globally for
/// creation (`fail_creates`).
pub struct InMemoryWindowManager {
    surfaces: DashMap<WindowId, SurfaceRecord, RandomState>,
    next_id: AtomicU64,
    active: RwLock<Option<WindowId>>,
    failing_closes: DashSet<WindowId, RandomState>,
    fail_creates: AtomicBool,
}

impl InMemoryWindowManager {
    pub fn new() -> Self {
        Self {
            surfaces: DashMap::with_hasher(RandomState::new()),
            next_id: AtomicU64::new(1),
            active: RwLock::new(None),
            failing_closes: DashSet::with_hasher(RandomState::new()),
            fail_creates: AtomicBool::new(false),
        }
    }

    /// Make every future close of `window` fail
    pub fn fail_close(&self, window: WindowId) {
        self.failing_closes.insert(window);
    }

    pub fn fail_creates(&self, fail: bool) {
        self.fail_creates.store(fail, Ordering::SeqCst);
    }

    pub fn contains(&self, window: WindowId) -> bool {
        self.surfaces.contains_key(&window)
    }

    pub fn active_surface(&self) -> Option<WindowId> {
        *self.active.read()
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

impl Default for InMemoryWindowManager {
    fn default() -> Self {
        Self::new()
    }
}

impl WindowManager for InMemoryWindowManager {
    fn create_surface<'a>(
        &'a self,
        instance: &'a Arc<AppInstance>,
    ) -> WindowFuture<'a, SurfaceHandle> {
        Box::pin(async move {
            tokio::task::yield_now().await;

            if self.fail_creates.load(Ordering::SeqCst) {
                return Err(WindowError::CreateFailed {
                    app_id: instance.app_id().to_string(),
                    reason: "surface creation disabled".to_string(),
                });
            }

            let id = self.next_id.fetch_add(1, Ordering::SeqCst);
            let handle = SurfaceHandle {
                id,
                title: instance.name().to_string(),
            };
            self.surfaces.insert(
                id,
                SurfaceRecord {
                    handle: handle.clone(),
                    instance: Arc::clone(instance),
                },
            );
            debug!(window = id, app_id = instance.app_id(), "Surface created");
            Ok(handle)
        })
    }

    fn close_surface(&self, window: WindowId) -> WindowFuture<'_, ()> {
        Box::pin(async move {
            tokio::task::yield_now().await;

            if self.failing_closes.contains(&window) {
                return Err(WindowError::CloseFailed {
                    window,
                    reason: "surface refused to close".to_string(),
                });
            }

            let (_, record) = self
                .surfaces
                .remove(&window)
                .ok_or(WindowError::SurfaceNotFound(window))?;

            let mut active = self.active.write();
            if *active == Some(window) {
                *active = None;
            }
            debug!(window, title = %record.handle.title, "Surface closed");
            Ok(())
        })
    }

    fn activate_surface(&self, window: WindowId) -> WindowResult<()> {
        if !self.surfaces.contains_key(&window) {
            return Err(WindowError::SurfaceNotFound(window));
        }
        *self.active.write() = Some(window);
        Ok(())
    }

    fn owner_of(&self, window: WindowId) -> Option<Arc<AppInstance>> {
        self.surfaces
            .get(&window)
            .map(|r| Arc::clone(&r.value().instance))
    }

    fn surfaces_of(&self, instance: &AppInstance) -> Vec<WindowId> {
        let mut windows: Vec<WindowId> = self
            .surfaces
            .iter()
            .filter(|r| r.value().instance.id() == instance.id())
            .map(|r| *r.key())
            .collect();
        windows.sort_unstable();
        windows
    }
}
