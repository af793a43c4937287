/*!
 * Supervisor Builder
 * Builder pattern for LifecycleSupervisor construction
 */

use super::context::RuntimeContext;
use super::locks::LifecycleLocks;
use super::supervisor::LifecycleSupervisor;
use crate::apps::AppRegistry;
use crate::config::RuntimeConfig;
use crate::indicators::{ActiveAppIndicator, DockState, MenuBarState, RunningIndicator};
use crate::window::{InMemoryWindowManager, WindowManager};
use ahash::RandomState;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;

/// Builder for LifecycleSupervisor
pub struct SupervisorBuilder {
    config: RuntimeConfig,
    registry: Option<Arc<AppRegistry>>,
    window_manager: Option<Arc<dyn WindowManager>>,
    dock: Option<Arc<dyn RunningIndicator>>,
    menu_bar: Option<Arc<dyn ActiveAppIndicator>>,
}

impl SupervisorBuilder {
    pub fn new(config: RuntimeConfig) -> Self {
        Self {
            config,
            registry: None,
            window_manager: None,
            dock: None,
            menu_bar: None,
        }
    }

    /// Share an existing registry instead of starting with an empty one
    pub fn with_registry(mut self, registry: Arc<AppRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_window_manager(mut self, window_manager: Arc<dyn WindowManager>) -> Self {
        self.window_manager = Some(window_manager);
        self
    }

    pub fn with_dock(mut self, dock: Arc<dyn RunningIndicator>) -> Self {
        self.dock = Some(dock);
        self
    }

    pub fn with_menu_bar(mut self, menu_bar: Arc<dyn ActiveAppIndicator>) -> Self {
        self.menu_bar = Some(menu_bar);
        self
    }

    /// Run without a process table
    pub fn without_supervision(mut self) -> Self {
        self.config.supervision = false;
        self
    }

    /// Build the supervisor; missing collaborators get in-memory defaults
    pub fn build(self) -> Arc<LifecycleSupervisor> {
        let registry = self
            .registry
            .unwrap_or_else(|| Arc::new(AppRegistry::new()));
        let context = RuntimeContext::with_registry(self.config, registry);

        let mut features = Vec::new();
        if context.processes().is_some() {
            features.push("process-table");
        }
        if self.window_manager.is_some() {
            features.push("window-manager");
        }
        if self.dock.is_some() {
            features.push("dock");
        }
        if self.menu_bar.is_some() {
            features.push("menu-bar");
        }
        info!(
            default_app = context.default_app_id(),
            "Lifecycle supervisor initialized with: {}",
            features.join(", ")
        );

        let window_manager = self
            .window_manager
            .unwrap_or_else(|| Arc::new(InMemoryWindowManager::new()) as Arc<dyn WindowManager>);
        let dock = self
            .dock
            .unwrap_or_else(|| Arc::new(DockState::new()) as Arc<dyn RunningIndicator>);
        let menu_bar = self
            .menu_bar
            .unwrap_or_else(|| Arc::new(MenuBarState::new()) as Arc<dyn ActiveAppIndicator>);

        Arc::new_cyclic(|self_ref| LifecycleSupervisor {
            context,
            window_manager,
            dock,
            menu_bar,
            running: DashMap::with_hasher(RandomState::new()),
            unsupervised: DashMap::with_hasher(RandomState::new()),
            locks: LifecycleLocks::new(),
            self_ref: self_ref.clone(),
        })
    }
}

impl Default for SupervisorBuilder {
    fn default() -> Self {
        Self::new(RuntimeConfig::default())
    }
}
