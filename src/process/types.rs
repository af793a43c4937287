/*!
 * Process Types
 * Common types for process bookkeeping
 */

use crate::core::serde::{is_empty_vec, is_false, system_time_micros};
use crate::core::types::{AppId, Pid, WindowId};
use serde::{Deserialize, Serialize};
use std::time::SystemTime;

/// Lifecycle status shared by an instance and its process entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    /// Instance constructed, no process identity yet
    Created,
    /// Registered and resident (with or without windows)
    Running,
    /// Windows are being closed and cleanup is running
    Terminating,
    /// Cleanup finished; the entry is about to be removed
    Terminated,
}

impl ProcessStatus {
    /// Whether moving from `self` to `next` is a legal transition
    pub fn can_transition_to(self, next: ProcessStatus) -> bool {
        use ProcessStatus::*;
        matches!(
            (self, next),
            (Created, Running)
                | (Created, Terminating)
                | (Running, Terminating)
                | (Terminating, Terminated)
        ) || self == next
    }
}

/// Point-in-time view of a process entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ProcessInfo {
    pub pid: Pid,
    pub app_id: AppId,
    pub name: String,
    pub status: ProcessStatus,
    #[serde(skip_serializing_if = "is_empty_vec", default)]
    pub windows: Vec<WindowId>,
    #[serde(with = "system_time_micros")]
    pub started_at: SystemTime,
    #[serde(skip_serializing_if = "is_false", default)]
    pub protected: bool,
}
