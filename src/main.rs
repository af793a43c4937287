/*!
 * Desktop Runtime - Main Entry Point
 *
 * Boots a desktop session:
 * - Application registry with the built-in applications
 * - Process table and lifecycle supervisor
 * - Headless window manager, dock and menu bar
 */

use desktop_runtime::apps::builtin::register_builtin;
use desktop_runtime::core::limits::ENV_CONFIG;
use desktop_runtime::{
    init_tracing, AppRegistry, DockState, InMemoryWindowManager, LaunchOptions,
    LifecycleSupervisor, MenuBarState, RuntimeConfig,
};
use miette::IntoDiagnostic;
use std::sync::Arc;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> miette::Result<()> {
    init_tracing();

    info!("Desktop runtime starting...");
    info!("================================================");

    let config = match std::env::var(ENV_CONFIG) {
        Ok(path) => {
            info!(path = %path, "Loading runtime config file");
            RuntimeConfig::from_json_file(&path)?.with_env_overrides()?
        }
        Err(_) => RuntimeConfig::from_env()?,
    };
    info!(
        default_app = %config.default_app_id,
        pid_base = config.pid_base,
        supervision = config.supervision,
        "Runtime configuration loaded"
    );

    info!("Registering built-in applications...");
    let registry = Arc::new(AppRegistry::new());
    let registered = register_builtin(&registry);
    info!(count = registered, "Applications registered");

    let window_manager = Arc::new(InMemoryWindowManager::new());
    let dock = Arc::new(DockState::new());
    let menu_bar = Arc::new(MenuBarState::new());

    let supervisor = LifecycleSupervisor::builder(config)
        .with_registry(registry)
        .with_window_manager(window_manager.clone())
        .with_dock(dock.clone())
        .with_menu_bar(menu_bar.clone())
        .build();

    let finder = supervisor.boot().await?;
    info!(pid = ?finder.pid(), "Default application running");

    info!("Opening welcome documents...");
    let editor = supervisor.launch("textedit", LaunchOptions::new()).await?;
    let scratch = supervisor.open_window("textedit").await?;
    info!(
        pid = ?editor.pid(),
        windows = window_manager.len(),
        scratch = scratch.id,
        "TextEdit ready"
    );
    supervisor.close_window(scratch.id).await?;

    info!("Desktop session ready");
    info!("================================================");
    info!(
        running = ?dock.running_apps(),
        active = ?menu_bar.active_app(),
        "Session state"
    );
    info!("Press Ctrl+C to exit");

    tokio::signal::ctrl_c().await.into_diagnostic()?;

    info!("Shutting down desktop session...");
    let report = supervisor.shutdown().await;
    for failure in &report.failures {
        warn!(error = %failure, "Shutdown failure");
    }
    info!(
        terminated = ?report.terminated,
        processes = supervisor.processes().len(),
        "Desktop runtime stopped"
    );
    Ok(())
}
