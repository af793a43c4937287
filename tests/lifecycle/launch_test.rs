/*!
 * Launch Tests
 * Instance creation, reuse, process allocation, and launch failures
 */

use crate::common::Harness;
use desktop_runtime::{
    factory, AppContext, AppManifest, Application, HookFuture, LaunchOptions, ProcessStatus,
    RegistryError, SupervisorError, SurfaceHandle,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[tokio::test]
async fn test_calculator_session_scenario() {
    let h = Harness::booted().await;

    let calc = h.supervisor.launch("calc", LaunchOptions::new()).await.unwrap();
    assert_eq!(calc.status(), ProcessStatus::Running);
    let pid = calc.pid().unwrap();
    assert!(pid >= 1000);

    let info = h.supervisor.process(pid).unwrap();
    assert_eq!(info.windows.len(), 1);
    assert_eq!(info.status, ProcessStatus::Running);
    assert!(h.dock.is_running("calc"));
    assert_eq!(h.menu_bar.active_app().as_deref(), Some("calc"));

    let window = info.windows[0];
    h.supervisor.close_window(window).await.unwrap();
    assert!(h.supervisor.is_running("calc"));
    assert_eq!(calc.status(), ProcessStatus::Running);
    assert!(h.supervisor.process(pid).unwrap().windows.is_empty());
    assert_eq!(h.menu_bar.active_app().as_deref(), Some("finder"));

    h.supervisor.terminate("calc").await.unwrap();
    assert!(h.supervisor.process(pid).is_none());
    assert!(!h.supervisor.is_running("calc"));
    assert!(!h.dock.is_running("calc"));
}

#[tokio::test]
async fn test_launch_unknown_app_changes_nothing() {
    let h = Harness::booted().await;
    let processes_before = h.supervisor.processes();
    let dock_before = h.dock.updates();
    let menu_before = h.menu_bar.changes();

    let err = h
        .supervisor
        .launch("nonexistent", LaunchOptions::new())
        .await
        .unwrap_err();

    assert_eq!(err, SupervisorError::AppNotFound("nonexistent".to_string()));
    assert_eq!(h.supervisor.processes(), processes_before);
    assert_eq!(h.dock.updates(), dock_before);
    assert_eq!(h.menu_bar.changes(), menu_before);
}

#[tokio::test]
async fn test_sequential_launches_reuse_instance() {
    let h = Harness::booted().await;

    let first = h.supervisor.launch("calc", LaunchOptions::new()).await.unwrap();
    let second = h.supervisor.launch("calc", LaunchOptions::new()).await.unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.pid(), second.pid());
    assert_eq!(h.calc.constructed(), 1);
    assert_eq!(h.supervisor.instances_of("calc").len(), 1);

    // The existing window is activated rather than duplicated
    assert_eq!(h.windows.len(), 1);
    assert_eq!(h.calc.initialized(), 1);
    assert_eq!(
        h.windows.active_surface(),
        first.current_surface().map(|s| s.id)
    );
}

#[tokio::test]
async fn test_new_window_option_opens_another_window() {
    let h = Harness::booted().await;

    let calc = h.supervisor.launch("calc", LaunchOptions::new()).await.unwrap();
    h.supervisor
        .launch("calc", LaunchOptions::new().new_window())
        .await
        .unwrap();

    let info = h.supervisor.process(calc.pid().unwrap()).unwrap();
    assert_eq!(info.windows.len(), 2);
    assert_eq!(h.calc.initialized(), 2);
}

#[tokio::test]
async fn test_boot_runs_default_app_headless_and_protected() {
    let h = Harness::new();
    let finder = h.supervisor.boot().await.unwrap();

    let info = h.supervisor.process(finder.pid().unwrap()).unwrap();
    assert!(info.protected);
    assert!(info.windows.is_empty());
    assert!(h.windows.is_empty());
    assert_eq!(h.finder.initialized(), 0);
    assert!(h.dock.is_running("finder"));
}

#[tokio::test]
async fn test_default_app_opens_window_when_asked() {
    let h = Harness::booted().await;

    let finder = h
        .supervisor
        .launch("finder", LaunchOptions::new().with_window())
        .await
        .unwrap();

    assert_eq!(h.supervisor.processes().len(), 1);
    assert_eq!(h.supervisor.process(finder.pid().unwrap()).unwrap().windows.len(), 1);
    assert_eq!(h.finder.initialized(), 1);
}

#[tokio::test]
async fn test_headless_launch_has_no_window() {
    let h = Harness::booted().await;

    let calc = h
        .supervisor
        .launch("calc", LaunchOptions::new().headless())
        .await
        .unwrap();

    assert!(calc.current_surface().is_none());
    assert!(h.windows.is_empty());
    assert!(h.supervisor.is_running("calc"));
}

#[tokio::test]
async fn test_force_new_instances_are_tracked_in_process_table() {
    let h = Harness::booted().await;

    let tracked = h.supervisor.launch("calc", LaunchOptions::new()).await.unwrap();
    let extra = h
        .supervisor
        .launch("calc", LaunchOptions::new().force_new())
        .await
        .unwrap();

    assert!(!Arc::ptr_eq(&tracked, &extra));
    assert!(extra.pid().unwrap() > tracked.pid().unwrap());
    assert!(Arc::ptr_eq(&h.supervisor.instance("calc").unwrap(), &tracked));
    assert_eq!(h.supervisor.instances_of("calc").len(), 2);
    assert!(!h.supervisor.process(extra.pid().unwrap()).unwrap().protected);
}

#[tokio::test]
async fn test_relaunch_after_terminate_gets_fresh_pid() {
    let h = Harness::booted().await;

    let first = h.supervisor.launch("calc", LaunchOptions::new()).await.unwrap();
    let old_pid = first.pid().unwrap();
    h.supervisor.terminate("calc").await.unwrap();

    let second = h.supervisor.launch("calc", LaunchOptions::new()).await.unwrap();
    assert!(second.pid().unwrap() > old_pid);
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first.status(), ProcessStatus::Terminated);
}

#[tokio::test]
async fn test_launch_without_loaded_type_reports_class_missing() {
    let h = Harness::booted().await;
    let _ = h
        .registry
        .register_with_loader(AppManifest::new("broken", "Broken"), || async {
            Err(anyhow::anyhow!("bundle missing"))
        })
        .await;

    let err = h
        .supervisor
        .launch("broken", LaunchOptions::new())
        .await
        .unwrap_err();

    match err {
        SupervisorError::AppClassMissing { app_id, source } => {
            assert_eq!(app_id, "broken");
            assert_eq!(source, RegistryError::TypeNotLoaded("broken".to_string()));
        }
        other => panic!("expected AppClassMissing, got {other:?}"),
    }
    assert_eq!(h.supervisor.processes().len(), 1);
    assert!(!h.dock.is_running("broken"));
}

#[tokio::test]
async fn test_initialize_failure_keeps_degraded_process() {
    let h = Harness::booted().await;
    h.calc.set_fail_initialize(true);

    let err = h
        .supervisor
        .launch("calc", LaunchOptions::new())
        .await
        .unwrap_err();
    assert!(matches!(err, SupervisorError::InitializeFailed { .. }));

    let calc = h.supervisor.instance("calc").expect("instance stays tracked");
    assert_eq!(calc.status(), ProcessStatus::Running);
    assert!(calc.current_surface().is_none());
    let pid = calc.pid().unwrap();
    assert_eq!(h.supervisor.process(pid).unwrap().windows.len(), 1);

    h.calc.set_fail_initialize(false);
    let surface = h.supervisor.open_window("calc").await.unwrap();
    assert_eq!(calc.current_surface(), Some(surface));
    assert_eq!(h.supervisor.process(pid).unwrap().windows.len(), 2);
    assert_eq!(h.calc.constructed(), 1);
}

#[tokio::test]
async fn test_plain_relaunch_after_initialize_failure_initializes_fresh_window() {
    let h = Harness::booted().await;
    h.calc.set_fail_initialize(true);
    h.supervisor
        .launch("calc", LaunchOptions::new())
        .await
        .unwrap_err();
    let calc = h.supervisor.instance("calc").unwrap();
    let failed = h.supervisor.process(calc.pid().unwrap()).unwrap().windows[0];
    assert!(!calc.is_initialized(failed));

    h.calc.set_fail_initialize(false);
    let again = h.supervisor.launch("calc", LaunchOptions::new()).await.unwrap();

    assert!(Arc::ptr_eq(&again, &calc));
    assert_eq!(h.calc.initialized(), 1);
    let current = calc.current_surface().expect("retry initializes a window");
    assert_ne!(current.id, failed);
    assert_eq!(calc.initialized_windows(), vec![current.id]);
    assert_eq!(h.windows.len(), 2);
    assert_eq!(h.windows.active_surface(), Some(current.id));

    // Once initialized, the window is reused instead of opening a third one
    h.supervisor.launch("calc", LaunchOptions::new()).await.unwrap();
    assert_eq!(h.windows.len(), 2);
    assert_eq!(h.calc.initialized(), 1);
}

/// Launches `calc` from its own initialize hook through the context handle
struct Launcher {
    context: AppContext,
}

impl Application for Launcher {
    fn initialize<'a>(&'a self, _surface: &'a SurfaceHandle) -> HookFuture<'a> {
        Box::pin(async move {
            let supervisor = self
                .context
                .supervisor()
                .ok_or_else(|| anyhow::anyhow!("runtime gone"))?;
            supervisor.launch("calc", LaunchOptions::new().headless()).await?;
            Ok(())
        })
    }

    fn cleanup(&self) -> HookFuture<'_> {
        Box::pin(async { Ok(()) })
    }
}

#[tokio::test]
async fn test_application_can_call_back_into_supervisor() {
    let h = Harness::booted().await;
    h.registry.register(
        AppManifest::new("launcher", "Launcher"),
        factory(|context| Launcher { context }),
    );

    h.supervisor
        .launch("launcher", LaunchOptions::new())
        .await
        .unwrap();

    assert!(h.supervisor.is_running("calc"));
    assert_eq!(h.supervisor.running_apps(), vec!["calc", "finder", "launcher"]);
}
