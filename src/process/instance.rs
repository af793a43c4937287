/*!
 * Application Instance
 * A constructed application bound to its manifest and lifecycle state
 */

use super::types::ProcessStatus;
use crate::apps::{AppManifest, Application};
use crate::core::types::{Pid, WindowId};
use crate::window::SurfaceHandle;
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Unique identity of an instance, independent of process bookkeeping
pub type InstanceId = Uuid;

pub struct AppInstance {
    id: InstanceId,
    manifest: Arc<AppManifest>,
    app: Box<dyn Application>,
    pid: RwLock<Option<Pid>>,
    status: RwLock<ProcessStatus>,
    surface: RwLock<Option<SurfaceHandle>>,
    // Windows whose initialize hook completed
    initialized: RwLock<BTreeSet<WindowId>>,
}

impl AppInstance {
    pub fn new(manifest: Arc<AppManifest>, app: Box<dyn Application>) -> Self {
        Self {
            id: Uuid::new_v4(),
            manifest,
            app,
            pid: RwLock::new(None),
            status: RwLock::new(ProcessStatus::Created),
            surface: RwLock::new(None),
            initialized: RwLock::new(BTreeSet::new()),
        }
    }

    pub fn id(&self) -> InstanceId {
        self.id
    }

    pub fn app_id(&self) -> &str {
        &self.manifest.id
    }

    pub fn name(&self) -> &str {
        &self.manifest.name
    }

    pub fn manifest(&self) -> &Arc<AppManifest> {
        &self.manifest
    }

    /// Process identity, absent until the process table allocates one
    pub fn pid(&self) -> Option<Pid> {
        *self.pid.read()
    }

    pub fn status(&self) -> ProcessStatus {
        *self.status.read()
    }

    pub fn is_running(&self) -> bool {
        self.status() == ProcessStatus::Running
    }

    /// Last successfully initialized window
    pub fn current_surface(&self) -> Option<SurfaceHandle> {
        self.surface.read().clone()
    }

    /// Windows that went through a successful `initialize`, ascending
    pub fn initialized_windows(&self) -> Vec<WindowId> {
        self.initialized.read().iter().copied().collect()
    }

    pub fn is_initialized(&self, window: WindowId) -> bool {
        self.initialized.read().contains(&window)
    }

    pub(crate) fn set_pid(&self, pid: Pid) {
        *self.pid.write() = Some(pid);
    }

    pub(crate) fn set_status(&self, status: ProcessStatus) {
        *self.status.write() = status;
    }

    /// Record `surface` as initialized and make it current
    pub(crate) fn set_surface(&self, surface: SurfaceHandle) {
        self.initialized.write().insert(surface.id);
        *self.surface.write() = Some(surface);
    }

    /// Forget `window`; clears the current surface if it is `window`
    pub(crate) fn clear_surface(&self, window: WindowId) {
        self.initialized.write().remove(&window);
        let mut surface = self.surface.write();
        if surface.as_ref().map(|s| s.id) == Some(window) {
            *surface = None;
        }
    }

    pub(crate) async fn initialize(&self, surface: &SurfaceHandle) -> anyhow::Result<()> {
        self.app.initialize(surface).await
    }

    pub(crate) async fn cleanup(&self) -> anyhow::Result<()> {
        self.app.cleanup().await
    }
}

impl fmt::Debug for AppInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppInstance")
            .field("id", &self.id)
            .field("app_id", &self.manifest.id)
            .field("pid", &self.pid())
            .field("status", &self.status())
            .finish()
    }
}
