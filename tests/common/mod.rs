/*!
 * Shared test harness
 * Supervisor wired to in-memory collaborators plus a probe application
 */

#![allow(dead_code)]

use desktop_runtime::{
    factory, AppContext, AppManifest, AppRegistry, Application, DockState, HookFuture,
    InMemoryWindowManager, LifecycleSupervisor, MenuBarState, RuntimeConfig, SurfaceHandle,
};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Counters and switches shared by every instance of one probe application
#[derive(Default)]
pub struct Probe {
    pub constructed: AtomicUsize,
    pub initialized: AtomicUsize,
    pub cleaned: AtomicUsize,
    pub fail_initialize: AtomicBool,
    pub fail_cleanup: AtomicBool,
    pub hook_delay_ms: AtomicU64,
}

impl Probe {
    pub fn constructed(&self) -> usize {
        self.constructed.load(Ordering::SeqCst)
    }

    pub fn initialized(&self) -> usize {
        self.initialized.load(Ordering::SeqCst)
    }

    pub fn cleaned(&self) -> usize {
        self.cleaned.load(Ordering::SeqCst)
    }

    pub fn set_fail_initialize(&self, fail: bool) {
        self.fail_initialize.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_cleanup(&self, fail: bool) {
        self.fail_cleanup.store(fail, Ordering::SeqCst);
    }

    pub fn set_hook_delay(&self, delay: Duration) {
        self.hook_delay_ms
            .store(delay.as_millis() as u64, Ordering::SeqCst);
    }

    async fn pause(&self) {
        let delay = self.hook_delay_ms.load(Ordering::SeqCst);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
    }
}

pub struct ProbeApp {
    probe: Arc<Probe>,
}

impl Application for ProbeApp {
    fn initialize<'a>(&'a self, _surface: &'a SurfaceHandle) -> HookFuture<'a> {
        Box::pin(async move {
            self.probe.pause().await;
            if self.probe.fail_initialize.load(Ordering::SeqCst) {
                anyhow::bail!("probe refused to initialize");
            }
            self.probe.initialized.fetch_add(1, Ordering::SeqCst);
            Ok(())
        })
    }

    fn cleanup(&self) -> HookFuture<'_> {
        Box::pin(async move {
            self.probe.pause().await;
            self.probe.cleaned.fetch_add(1, Ordering::SeqCst);
            if self.probe.fail_cleanup.load(Ordering::SeqCst) {
                anyhow::bail!("probe cleanup exploded");
            }
            Ok(())
        })
    }
}

/// Register a probe application under `app_id`
pub fn register_probe(registry: &AppRegistry, app_id: &str, name: &str) -> Arc<Probe> {
    let probe = Arc::new(Probe::default());
    let shared = Arc::clone(&probe);
    registry.register(
        AppManifest::new(app_id, name),
        factory(move |_ctx: AppContext| {
            shared.constructed.fetch_add(1, Ordering::SeqCst);
            ProbeApp {
                probe: Arc::clone(&shared),
            }
        }),
    );
    probe
}

pub struct Harness {
    pub supervisor: Arc<LifecycleSupervisor>,
    pub registry: Arc<AppRegistry>,
    pub windows: Arc<InMemoryWindowManager>,
    pub dock: Arc<DockState>,
    pub menu_bar: Arc<MenuBarState>,
    pub finder: Arc<Probe>,
    pub calc: Arc<Probe>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_config(RuntimeConfig::default())
    }

    /// `finder` (default app) and `calc` are registered as probes
    pub fn with_config(config: RuntimeConfig) -> Self {
        let registry = Arc::new(AppRegistry::new());
        let finder = register_probe(&registry, "finder", "Finder");
        let calc = register_probe(&registry, "calc", "Calculator");

        let windows = Arc::new(InMemoryWindowManager::new());
        let dock = Arc::new(DockState::new());
        let menu_bar = Arc::new(MenuBarState::new());

        let supervisor = LifecycleSupervisor::builder(config)
            .with_registry(Arc::clone(&registry))
            .with_window_manager(windows.clone())
            .with_dock(dock.clone())
            .with_menu_bar(menu_bar.clone())
            .build();

        Self {
            supervisor,
            registry,
            windows,
            dock,
            menu_bar,
            finder,
            calc,
        }
    }

    pub fn probe(&self, app_id: &str, name: &str) -> Arc<Probe> {
        register_probe(&self.registry, app_id, name)
    }

    /// Harness with the default application already booted
    pub async fn booted() -> Self {
        let harness = Self::new();
        harness.supervisor.boot().await.expect("boot failed");
        harness
    }
}
