/*!
 * Lifecycle Supervisor
 * Launch, termination, and window-close handling for application instances
 */

use super::builder::SupervisorBuilder;
use super::context::RuntimeContext;
use super::locks::LifecycleLocks;
use super::options::LaunchOptions;
use crate::apps::{AppContext, AppManifest, AppRegistry};
use crate::config::RuntimeConfig;
use crate::core::errors::{SupervisorError, SupervisorResult};
use crate::core::types::{AppId, Pid, WindowId};
use crate::indicators::{ActiveAppIndicator, RunningIndicator};
use crate::monitoring::LifecycleSpan;
use crate::process::{AppInstance, ProcessInfo, ProcessStatus, ProcessTable};
use crate::window::{SurfaceHandle, WindowManager};
use ahash::RandomState;
use dashmap::DashMap;
use serde::Serialize;
use std::sync::{Arc, Weak};
use tracing::{debug, info, warn, Instrument};

/// Outcome of an orderly shutdown
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ShutdownReport {
    /// Applications whose instances were torn down, in teardown order
    pub terminated: Vec<AppId>,
    /// Errors reported while tearing down; bookkeeping was still cleaned up
    pub failures: Vec<String>,
}

pub struct LifecycleSupervisor {
    pub(super) context: RuntimeContext,
    pub(super) window_manager: Arc<dyn WindowManager>,
    pub(super) dock: Arc<dyn RunningIndicator>,
    pub(super) menu_bar: Arc<dyn ActiveAppIndicator>,
    /// The tracked running instance per application id
    pub(super) running: DashMap<AppId, Arc<AppInstance>, RandomState>,
    /// Every live instance per application id, oldest first; only used
    /// without a process table
    pub(super) unsupervised: DashMap<AppId, Vec<Arc<AppInstance>>, RandomState>,
    pub(super) locks: LifecycleLocks,
    pub(super) self_ref: Weak<LifecycleSupervisor>,
}

impl LifecycleSupervisor {
    /// Create a builder for constructing a LifecycleSupervisor
    pub fn builder(config: RuntimeConfig) -> SupervisorBuilder {
        SupervisorBuilder::new(config)
    }

    pub fn config(&self) -> &RuntimeConfig {
        self.context.config()
    }

    pub fn registry(&self) -> &Arc<AppRegistry> {
        self.context.registry()
    }

    /// None when running without process supervision
    pub fn process_table(&self) -> Option<&Arc<ProcessTable>> {
        self.context.processes()
    }

    pub fn window_manager(&self) -> &Arc<dyn WindowManager> {
        &self.window_manager
    }

    pub fn default_app_id(&self) -> &str {
        self.context.default_app_id()
    }

    pub fn is_default_app(&self, app_id: &str) -> bool {
        app_id == self.context.default_app_id()
    }

    /// The tracked running instance of `app_id`
    pub fn instance(&self, app_id: &str) -> Option<Arc<AppInstance>> {
        self.running.get(app_id).map(|r| Arc::clone(r.value()))
    }

    pub fn is_running(&self, app_id: &str) -> bool {
        self.running.contains_key(app_id)
    }

    /// Ids of all tracked applications, sorted
    pub fn running_apps(&self) -> Vec<AppId> {
        let mut apps: Vec<AppId> = self.running.iter().map(|r| r.key().clone()).collect();
        apps.sort();
        apps
    }

    /// Every live instance of `app_id`, including forced extras, oldest first
    pub fn instances_of(&self, app_id: &str) -> Vec<Arc<AppInstance>> {
        match self.context.processes() {
            Some(table) => table
                .pids_for_app(app_id)
                .into_iter()
                .filter_map(|pid| table.instance(pid))
                .collect(),
            None => self
                .unsupervised
                .get(app_id)
                .map(|r| r.value().clone())
                .unwrap_or_default(),
        }
    }

    pub fn processes(&self) -> Vec<ProcessInfo> {
        self.context
            .processes()
            .map(|table| table.list())
            .unwrap_or_default()
    }

    pub fn process(&self, pid: Pid) -> Option<ProcessInfo> {
        self.context.processes().and_then(|table| table.get(pid))
    }

    /// Start the default application headless as a protected process
    pub async fn boot(&self) -> SupervisorResult<Arc<AppInstance>> {
        let default_app = self.default_app_id().to_string();
        info!(app_id = %default_app, "Booting default application");
        self.launch(&default_app, LaunchOptions::new()).await
    }

    /// Launch `app_id`, reusing the tracked instance unless `force_new` is set
    pub async fn launch(
        &self,
        app_id: &str,
        options: LaunchOptions,
    ) -> SupervisorResult<Arc<AppInstance>> {
        let span = self.span("launch", app_id);
        let result = self
            .launch_inner(app_id, options, &span)
            .instrument(span.span())
            .await
            .map(|(instance, _)| instance);
        Self::finish(&span, &result);
        result
    }

    /// Open and initialize a new window, launching the application if needed
    ///
    /// Also the retry path after a failed `initialize`.
    pub async fn open_window(&self, app_id: &str) -> SupervisorResult<SurfaceHandle> {
        let span = self.span("open_window", app_id);
        let result = self
            .launch_inner(app_id, LaunchOptions::new().new_window(), &span)
            .instrument(span.span())
            .await
            .and_then(|(instance, surface)| {
                surface.ok_or_else(|| SupervisorError::InitializeFailed {
                    app_id: instance.app_id().to_string(),
                    reason: "no window was opened".to_string(),
                })
            });
        Self::finish(&span, &result);
        result
    }

    async fn launch_inner(
        &self,
        app_id: &str,
        options: LaunchOptions,
        span: &LifecycleSpan,
    ) -> SupervisorResult<(Arc<AppInstance>, Option<SurfaceHandle>)> {
        let manifest = self
            .context
            .registry()
            .manifest(app_id)
            .ok_or_else(|| SupervisorError::AppNotFound(app_id.to_string()))?;

        let _guard = self.locks.acquire(app_id).await;
        let is_default = self.is_default_app(app_id);

        let tracked = if options.force_new {
            None
        } else {
            self.instance(app_id)
        };
        let created = tracked.is_none();
        let instance = match tracked {
            Some(instance) => {
                debug!(app_id, pid = ?instance.pid(), "Reusing running instance");
                instance
            }
            None => self.spawn_instance(manifest, is_default)?,
        };
        if let Some(pid) = instance.pid() {
            span.record_pid(pid);
        }

        if !options.wants_window(is_default) {
            return Ok((instance, None));
        }

        if !created && !options.new_window {
            if let Some(window) = self.visible_window(&instance) {
                debug!(app_id, window, "Instance already has a window, activating it");
                self.focus_surface(&instance, window)?;
                return Ok((instance, None));
            }
        }

        let surface = self.open_surface(&instance).await?;
        Ok((instance, Some(surface)))
    }

    fn spawn_instance(
        &self,
        manifest: Arc<AppManifest>,
        is_default: bool,
    ) -> SupervisorResult<Arc<AppInstance>> {
        let app_id = manifest.id.clone();
        let constructor = self
            .context
            .registry()
            .resolve_type(&app_id)
            .map_err(|source| SupervisorError::AppClassMissing {
                app_id: app_id.clone(),
                source,
            })?;

        let context = AppContext::new(Arc::clone(&manifest), self.self_ref.clone());
        let instance = Arc::new(AppInstance::new(manifest, (constructor.as_ref())(context)));
        let first = !self.running.contains_key(&app_id);

        match self.context.processes() {
            Some(table) => {
                // Only the tracked default instance is protected; forced extras are not
                let pid = table.allocate(&instance, is_default && first);
                table.set_status(pid, ProcessStatus::Running);
            }
            None => {
                instance.set_status(ProcessStatus::Running);
                self.unsupervised
                    .entry(app_id.clone())
                    .or_default()
                    .push(Arc::clone(&instance));
                info!(app_id = %app_id, "Instance started without process supervision");
            }
        }

        if first {
            self.running.insert(app_id.clone(), Arc::clone(&instance));
        } else {
            info!(app_id = %app_id, pid = ?instance.pid(), "Started additional instance");
        }
        self.dock.set_running_indicator(&app_id, true);
        Ok(instance)
    }

    /// Create a surface for `instance`, register it, and run `initialize`
    ///
    /// A failing `initialize` leaves the process registered with the window
    /// attached but no current surface.
    async fn open_surface(&self, instance: &Arc<AppInstance>) -> SupervisorResult<SurfaceHandle> {
        let surface = self.window_manager.create_surface(instance).await?;

        if let (Some(table), Some(pid)) = (self.context.processes(), instance.pid()) {
            table.register_window(pid, surface.id);
        }

        if let Err(e) = instance.initialize(&surface).await {
            warn!(
                app_id = instance.app_id(),
                window = surface.id,
                error = %e,
                "Initialize hook failed, process stays registered"
            );
            return Err(SupervisorError::InitializeFailed {
                app_id: instance.app_id().to_string(),
                reason: format!("{e:#}"),
            });
        }

        instance.set_surface(surface.clone());
        self.focus_surface(instance, surface.id)?;
        info!(
            app_id = instance.app_id(),
            pid = ?instance.pid(),
            window = surface.id,
            "Window opened"
        );
        Ok(surface)
    }

    /// A live window of `instance` whose `initialize` succeeded
    ///
    /// Windows left behind by a failed `initialize` never qualify.
    fn visible_window(&self, instance: &AppInstance) -> Option<WindowId> {
        let live: Vec<WindowId> = self
            .window_manager
            .surfaces_of(instance)
            .into_iter()
            .filter(|id| instance.is_initialized(*id))
            .collect();
        instance
            .current_surface()
            .map(|s| s.id)
            .filter(|id| live.contains(id))
            .or_else(|| live.first().copied())
    }

    fn focus_surface(&self, instance: &Arc<AppInstance>, window: WindowId) -> SupervisorResult<()> {
        self.window_manager.activate_surface(window)?;
        self.menu_bar.set_active_app(instance);
        Ok(())
    }

    /// Terminate the tracked instance of `app_id`
    ///
    /// No-op for the default application and for applications that are not
    /// running.
    pub async fn terminate(&self, app_id: &str) -> SupervisorResult<()> {
        if self.is_default_app(app_id) {
            debug!(app_id, "Default application is never terminated");
            return Ok(());
        }

        let span = self.span("terminate", app_id);
        let result = async {
            let _guard = self.locks.acquire(app_id).await;
            match self.instance(app_id) {
                Some(instance) => {
                    if let Some(pid) = instance.pid() {
                        span.record_pid(pid);
                    }
                    self.terminate_instance(&instance).await
                }
                None => {
                    debug!(app_id, "Terminate requested for an application that is not running");
                    Ok(())
                }
            }
        }
        .instrument(span.span())
        .await;
        Self::finish(&span, &result);
        result
    }

    /// Terminate any supervised process, including forced extra instances
    pub async fn terminate_process(&self, pid: Pid) -> SupervisorResult<()> {
        let table = self
            .context
            .processes()
            .ok_or(SupervisorError::ProcessNotFound(pid))?;
        let instance = table
            .instance(pid)
            .ok_or(SupervisorError::ProcessNotFound(pid))?;

        if table.is_protected(pid) || self.is_tracked_default(&instance) {
            debug!(pid, "Protected process is never terminated");
            return Ok(());
        }

        let span = self.span("terminate_process", instance.app_id());
        span.record_pid(pid);
        let result = async {
            let _guard = self.locks.acquire(instance.app_id()).await;
            if !table.contains(pid) {
                debug!(pid, "Process already gone");
                return Ok(());
            }
            self.terminate_instance(&instance).await
        }
        .instrument(span.span())
        .await;
        Self::finish(&span, &result);
        result
    }

    fn is_tracked_default(&self, instance: &Arc<AppInstance>) -> bool {
        self.is_default_app(instance.app_id())
            && self
                .instance(instance.app_id())
                .map_or(false, |tracked| Arc::ptr_eq(&tracked, instance))
    }

    /// Caller holds the lifecycle lock of the instance's application
    async fn terminate_instance(&self, instance: &Arc<AppInstance>) -> SupervisorResult<()> {
        let app_id = instance.app_id().to_string();

        let (table, pid) = match (self.context.processes(), instance.pid()) {
            (Some(table), Some(pid)) if table.contains(pid) => (table, pid),
            _ => return self.terminate_unsupervised(instance).await,
        };

        if table.is_protected(pid) {
            warn!(pid, app_id = %app_id, "Refusing to terminate protected process");
            return Ok(());
        }

        table.set_status(pid, ProcessStatus::Terminating);

        // Snapshot: close callbacks may mutate the window set while we iterate
        let windows = table.windows_of(pid);
        let mut failures = Vec::new();

        for window in windows {
            match self.window_manager.close_surface(window).await {
                Ok(()) => {
                    table.unregister_window(pid, window);
                    instance.clear_surface(window);
                }
                Err(e) => {
                    warn!(pid, window, error = %e, "Failed to close window during termination");
                    failures.push(e.to_string());
                }
            }
        }

        if let Err(e) = instance.cleanup().await {
            warn!(pid, app_id = %app_id, error = %e, "Cleanup hook failed");
            failures.push(format!("cleanup failed: {e:#}"));
        }

        table.set_status(pid, ProcessStatus::Terminated);
        table.remove(pid);
        self.untrack(instance);
        info!(pid, app_id = %app_id, "Process terminated");

        self.refocus_default();

        if failures.is_empty() {
            Ok(())
        } else {
            Err(SupervisorError::TerminateFailed { app_id, failures })
        }
    }

    /// Termination without process-table bookkeeping
    async fn terminate_unsupervised(&self, instance: &Arc<AppInstance>) -> SupervisorResult<()> {
        let app_id = instance.app_id().to_string();
        if self.is_tracked_default(instance) {
            debug!(app_id = %app_id, "Default application is never terminated");
            return Ok(());
        }

        instance.set_status(ProcessStatus::Terminating);
        let result = instance.cleanup().await.map_err(|e| {
            warn!(app_id = %app_id, error = %e, "Cleanup hook failed");
            SupervisorError::TerminateFailed {
                app_id: app_id.clone(),
                failures: vec![format!("cleanup failed: {e:#}")],
            }
        });
        instance.set_status(ProcessStatus::Terminated);

        self.untrack(instance);
        info!(app_id = %app_id, "Instance terminated without process supervision");
        self.refocus_default();
        result
    }

    /// Stop tracking `instance`; promote the oldest remaining extra if any
    fn untrack(&self, instance: &Arc<AppInstance>) {
        let app_id = instance.app_id();
        if let Some(mut live) = self.unsupervised.get_mut(app_id) {
            live.retain(|other| !Arc::ptr_eq(other, instance));
        }
        self.unsupervised.remove_if(app_id, |_, live| live.is_empty());

        let was_tracked = self
            .running
            .remove_if(app_id, |_, tracked| Arc::ptr_eq(tracked, instance))
            .is_some();

        if was_tracked {
            if let Some(next) = self.instances_of(app_id).into_iter().next() {
                info!(app_id, pid = ?next.pid(), "Promoted remaining instance to tracked");
                self.running.insert(app_id.to_string(), next);
            }
        }

        if !self.is_running(app_id) && self.instances_of(app_id).is_empty() {
            self.dock.set_running_indicator(app_id, false);
        }
    }

    fn refocus_default(&self) {
        if let Some(default) = self.instance(self.default_app_id()) {
            self.menu_bar.set_active_app(&default);
            debug!(app_id = default.app_id(), "Menu bar refocused to default application");
        }
    }

    /// Close one window; the owning application stays resident
    pub async fn close_window(&self, window: WindowId) -> SupervisorResult<()> {
        let span = self.span("close_window", &window.to_string());
        let result = self
            .close_window_inner(window)
            .instrument(span.span())
            .await;
        Self::finish(&span, &result);
        result
    }

    async fn close_window_inner(&self, window: WindowId) -> SupervisorResult<()> {
        let owner = self.window_owner(window);
        self.window_manager.close_surface(window).await?;

        let Some(instance) = owner else {
            debug!(window, "Closed a window without a known owner");
            return Ok(());
        };
        instance.clear_surface(window);

        let remaining = match (self.context.processes(), instance.pid()) {
            (Some(table), Some(pid)) if table.contains(pid) => {
                table.unregister_window(pid, window);
                table.windows_of(pid).len()
            }
            _ => self.window_manager.surfaces_of(&instance).len(),
        };

        if remaining == 0 && !self.is_default_app(instance.app_id()) {
            info!(
                app_id = instance.app_id(),
                "Last window closed, application stays resident"
            );
            self.refocus_default();
        }
        Ok(())
    }

    /// Bring a window to the front and make its application active
    pub fn focus_window(&self, window: WindowId) -> SupervisorResult<()> {
        self.window_manager.activate_surface(window)?;
        if let Some(instance) = self.window_owner(window) {
            self.menu_bar.set_active_app(&instance);
        }
        Ok(())
    }

    fn window_owner(&self, window: WindowId) -> Option<Arc<AppInstance>> {
        self.context
            .processes()
            .and_then(|table| table.owner_of(window).and_then(|pid| table.instance(pid)))
            .or_else(|| self.window_manager.owner_of(window))
    }

    /// Terminate every unprotected process, newest first
    pub async fn shutdown(&self) -> ShutdownReport {
        let span = self.span("shutdown", self.default_app_id());
        let report = self.shutdown_inner().instrument(span.span()).await;
        span.record_result(report.failures.is_empty());
        info!(
            terminated = report.terminated.len(),
            failures = report.failures.len(),
            "Shutdown complete"
        );
        report
    }

    async fn shutdown_inner(&self) -> ShutdownReport {
        let mut report = ShutdownReport::default();

        let victims: Vec<Arc<AppInstance>> = match self.context.processes() {
            Some(table) => table
                .pids()
                .into_iter()
                .rev()
                .filter(|pid| !table.is_protected(*pid))
                .filter_map(|pid| table.instance(pid))
                .collect(),
            None => {
                // No pids to order by: apps by id, newest instance first within each
                let mut apps: Vec<(AppId, Vec<Arc<AppInstance>>)> = self
                    .unsupervised
                    .iter()
                    .map(|r| (r.key().clone(), r.value().clone()))
                    .collect();
                apps.sort_by(|a, b| a.0.cmp(&b.0));
                apps.into_iter()
                    .flat_map(|(_, live)| live.into_iter().rev())
                    .filter(|instance| !self.is_tracked_default(instance))
                    .collect()
            }
        };

        for instance in victims {
            let app_id = instance.app_id().to_string();
            let _guard = self.locks.acquire(&app_id).await;
            if instance.status() != ProcessStatus::Running {
                continue;
            }
            if let Err(e) = self.terminate_instance(&instance).await {
                warn!(app_id = %app_id, error = %e, "Shutdown of application reported errors");
                report.failures.push(e.to_string());
            }
            report.terminated.push(app_id);
        }

        report
    }

    fn span(&self, operation: &'static str, subject: &str) -> LifecycleSpan {
        LifecycleSpan::new(
            operation,
            subject,
            self.context.config().slow_operation_threshold(),
        )
    }

    fn finish<T>(span: &LifecycleSpan, result: &SupervisorResult<T>) {
        match result {
            Ok(_) => span.record_result(true),
            Err(e) => span.record_error(&e.to_string()),
        }
    }
}
