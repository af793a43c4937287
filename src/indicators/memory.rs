/*!
 * Recording Indicators
 * In-memory dock and menu bar that remember what they were told
 */

use super::traits::{ActiveAppIndicator, RunningIndicator};
use crate::core::types::{AppId, Pid};
use crate::process::AppInstance;
use parking_lot::{Mutex, RwLock};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

#[derive(Default)]
pub struct DockState {
    running: RwLock<BTreeSet<AppId>>,
    updates: Mutex<Vec<(AppId, bool)>>,
}

impl DockState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_running(&self, app_id: &str) -> bool {
        self.running.read().contains(app_id)
    }

    /// Apps currently shown as running, ordered by id
    pub fn running_apps(&self) -> Vec<AppId> {
        self.running.read().iter().cloned().collect()
    }

    /// Every indicator update received, oldest first
    pub fn updates(&self) -> Vec<(AppId, bool)> {
        self.updates.lock().clone()
    }
}

impl RunningIndicator for DockState {
    fn set_running_indicator(&self, app_id: &str, running: bool) {
        {
            let mut set = self.running.write();
            if running {
                set.insert(app_id.to_string());
            } else {
                set.remove(app_id);
            }
        }
        self.updates.lock().push((app_id.to_string(), running));
        debug!(app_id, running, "Dock indicator updated");
    }
}

#[derive(Default)]
pub struct MenuBarState {
    active: RwLock<Option<(AppId, Option<Pid>)>>,
    changes: Mutex<usize>,
}

impl MenuBarState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_app(&self) -> Option<AppId> {
        self.active.read().as_ref().map(|(app_id, _)| app_id.clone())
    }

    pub fn active_pid(&self) -> Option<Pid> {
        self.active.read().as_ref().and_then(|(_, pid)| *pid)
    }

    /// How many times the active application was set
    pub fn changes(&self) -> usize {
        *self.changes.lock()
    }
}

impl ActiveAppIndicator for MenuBarState {
    fn set_active_app(&self, instance: &Arc<AppInstance>) {
        *self.active.write() = Some((instance.app_id().to_string(), instance.pid()));
        *self.changes.lock() += 1;
        debug!(app_id = instance.app_id(), "Menu bar active app updated");
    }
}

