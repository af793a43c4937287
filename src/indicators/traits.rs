/*!
 * Indicator Traits
 * Passive UI sinks notified of application state changes
 */

use crate::process::AppInstance;
use std::sync::Arc;

/// Dock / taskbar: shows which applications are running
pub trait RunningIndicator: Send + Sync {
    fn set_running_indicator(&self, app_id: &str, running: bool);
}

/// Menu bar: shows the application that currently has focus
pub trait ActiveAppIndicator: Send + Sync {
    fn set_active_app(&self, instance: &Arc<AppInstance>);
}
