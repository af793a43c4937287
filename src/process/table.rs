/*!
 * Process Table
 * Process identity allocation and per-process bookkeeping
 */

use super::instance::AppInstance;
use super::types::{ProcessInfo, ProcessStatus};
use crate::core::limits::DEFAULT_PID_BASE;
use crate::core::types::{Pid, WindowId};
use ahash::RandomState;
use dashmap::{DashMap, DashSet};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info, warn};

struct ProcessEntry {
    instance: Arc<AppInstance>,
    name: String,
    status: ProcessStatus,
    windows: BTreeSet<WindowId>,
    started_at: SystemTime,
}

pub struct ProcessTable {
    processes: DashMap<Pid, ProcessEntry, RandomState>,
    // Reverse index; a window belongs to at most one process
    window_owners: DashMap<WindowId, Pid, RandomState>,
    system_pids: DashSet<Pid, RandomState>,
    next_pid: AtomicU32,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self::with_pid_base(DEFAULT_PID_BASE)
    }

    pub fn with_pid_base(pid_base: u32) -> Self {
        info!(pid_base, "Process table initialized");
        Self {
            processes: DashMap::with_hasher(RandomState::new()),
            window_owners: DashMap::with_hasher(RandomState::new()),
            system_pids: DashSet::with_hasher(RandomState::new()),
            next_pid: AtomicU32::new(pid_base),
        }
    }

    /// Mint a process identity for `instance` and start tracking it
    pub fn allocate(&self, instance: &Arc<AppInstance>, is_system: bool) -> Pid {
        // Allocate PID atomically
        let pid = self.next_pid.fetch_add(1, Ordering::SeqCst);

        let entry = ProcessEntry {
            instance: Arc::clone(instance),
            name: instance.name().to_string(),
            status: instance.status(),
            windows: BTreeSet::new(),
            started_at: SystemTime::now(),
        };

        instance.set_pid(pid);
        self.processes.insert(pid, entry);
        if is_system {
            self.system_pids.insert(pid);
        }

        info!(
            pid,
            app_id = instance.app_id(),
            system = is_system,
            "Allocated process"
        );
        pid
    }

    /// Attach a window to a process, moving it away from any previous owner
    ///
    /// Returns false (and changes nothing) when the process is unknown.
    pub fn register_window(&self, pid: Pid, window: WindowId) -> bool {
        if !self.processes.contains_key(&pid) {
            debug!(pid, window, "register_window on unknown process ignored");
            return false;
        }

        let previous = self.window_owners.get(&window).map(|r| *r.value());
        if let Some(previous) = previous.filter(|&p| p != pid) {
            if let Some(mut entry) = self.processes.get_mut(&previous) {
                entry.windows.remove(&window);
            }
            warn!(window, from = previous, to = pid, "Window moved between processes");
        }

        match self.processes.get_mut(&pid) {
            Some(mut entry) => {
                entry.windows.insert(window);
            }
            None => return false,
        }
        self.window_owners.insert(window, pid);
        debug!(pid, window, "Window registered");
        true
    }

    /// Detach a window from a process; no-op if either is unknown
    pub fn unregister_window(&self, pid: Pid, window: WindowId) -> bool {
        let removed = self
            .processes
            .get_mut(&pid)
            .map(|mut entry| entry.windows.remove(&window))
            .unwrap_or(false);

        if removed {
            self.window_owners
                .remove_if(&window, |_, owner| *owner == pid);
            debug!(pid, window, "Window unregistered");
        }
        removed
    }

    /// Drop a process entry; callers sequence termination before this
    pub fn remove(&self, pid: Pid) -> Option<Arc<AppInstance>> {
        let (_, entry) = self.processes.remove(&pid)?;

        for window in &entry.windows {
            self.window_owners.remove_if(window, |_, owner| *owner == pid);
        }
        if self.system_pids.contains(&pid) {
            warn!(pid, "Removed a protected process entry");
        }

        info!(pid, name = %entry.name, "Process entry removed");
        Some(entry.instance)
    }

    pub fn is_protected(&self, pid: Pid) -> bool {
        self.system_pids.contains(&pid)
    }

    /// Move entry and instance to `status` together
    ///
    /// Illegal transitions are refused and leave both untouched.
    pub fn set_status(&self, pid: Pid, status: ProcessStatus) -> bool {
        let mut entry = match self.processes.get_mut(&pid) {
            Some(e) => e,
            None => return false,
        };

        if !entry.status.can_transition_to(status) {
            warn!(pid, from = ?entry.status, to = ?status, "Invalid status transition refused");
            return false;
        }

        entry.status = status;
        entry.instance.set_status(status);
        true
    }

    pub fn get(&self, pid: Pid) -> Option<ProcessInfo> {
        self.processes
            .get(&pid)
            .map(|r| self.snapshot(*r.key(), r.value()))
    }

    pub fn instance(&self, pid: Pid) -> Option<Arc<AppInstance>> {
        self.processes
            .get(&pid)
            .map(|r| Arc::clone(&r.value().instance))
    }

    pub fn contains(&self, pid: Pid) -> bool {
        self.processes.contains_key(&pid)
    }

    /// Windows owned by `pid`, in ascending order
    pub fn windows_of(&self, pid: Pid) -> Vec<WindowId> {
        self.processes
            .get(&pid)
            .map(|r| r.value().windows.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn owner_of(&self, window: WindowId) -> Option<Pid> {
        self.window_owners.get(&window).map(|r| *r.value())
    }

    /// Live pids for an application, oldest first
    pub fn pids_for_app(&self, app_id: &str) -> Vec<Pid> {
        let mut pids: Vec<Pid> = self
            .processes
            .iter()
            .filter(|r| r.value().instance.app_id() == app_id)
            .map(|r| *r.key())
            .collect();
        pids.sort_unstable();
        pids
    }

    /// Every live pid, ascending
    pub fn pids(&self) -> Vec<Pid> {
        let mut pids: Vec<Pid> = self.processes.iter().map(|r| *r.key()).collect();
        pids.sort_unstable();
        pids
    }

    /// Snapshots of every process, ordered by pid
    pub fn list(&self) -> Vec<ProcessInfo> {
        let mut infos: Vec<ProcessInfo> = self
            .processes
            .iter()
            .map(|r| self.snapshot(*r.key(), r.value()))
            .collect();
        infos.sort_by_key(|info| info.pid);
        infos
    }

    pub fn len(&self) -> usize {
        self.processes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    fn snapshot(&self, pid: Pid, entry: &ProcessEntry) -> ProcessInfo {
        ProcessInfo {
            pid,
            app_id: entry.instance.app_id().to_string(),
            name: entry.name.clone(),
            status: entry.status,
            windows: entry.windows.iter().copied().collect(),
            started_at: entry.started_at,
            protected: self.system_pids.contains(&pid),
        }
    }
}

impl Default for ProcessTable {
    fn default() -> Self {
        Self::new()
    }
}
