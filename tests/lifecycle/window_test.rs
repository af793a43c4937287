/*!
 * Window Tests
 * Window close, focus, and ownership bookkeeping
 */

use crate::common::Harness;
use desktop_runtime::{LaunchOptions, SupervisorError, WindowError};
use pretty_assertions::assert_eq;

#[tokio::test]
async fn test_close_unknown_window_reports_not_found() {
    let h = Harness::booted().await;
    let changes_before = h.menu_bar.changes();

    let err = h.supervisor.close_window(999).await.unwrap_err();

    assert_eq!(err, SupervisorError::Window(WindowError::SurfaceNotFound(999)));
    assert_eq!(h.menu_bar.changes(), changes_before);
}

#[tokio::test]
async fn test_closing_last_window_keeps_app_resident() {
    let h = Harness::booted().await;
    let calc = h.supervisor.launch("calc", LaunchOptions::new()).await.unwrap();
    let pid = calc.pid().unwrap();
    let window = calc.current_surface().unwrap().id;

    h.supervisor.close_window(window).await.unwrap();

    assert!(h.supervisor.is_running("calc"));
    assert!(h.dock.is_running("calc"));
    assert!(h.supervisor.process(pid).unwrap().windows.is_empty());
    assert!(calc.current_surface().is_none());
    assert_eq!(h.menu_bar.active_app().as_deref(), Some("finder"));
    assert_eq!(h.calc.cleaned(), 0);
}

#[tokio::test]
async fn test_closing_one_of_two_windows_does_not_refocus() {
    let h = Harness::booted().await;
    let calc = h.supervisor.launch("calc", LaunchOptions::new()).await.unwrap();
    let first = calc.current_surface().unwrap().id;
    let second = h.supervisor.open_window("calc").await.unwrap();
    let changes_before = h.menu_bar.changes();

    h.supervisor.close_window(first).await.unwrap();

    assert_eq!(h.menu_bar.changes(), changes_before);
    assert_eq!(h.menu_bar.active_app().as_deref(), Some("calc"));
    assert_eq!(
        h.supervisor.process(calc.pid().unwrap()).unwrap().windows,
        vec![second.id]
    );
    assert_eq!(calc.current_surface().map(|s| s.id), Some(second.id));
}

#[tokio::test]
async fn test_relaunch_after_close_opens_fresh_window() {
    let h = Harness::booted().await;
    let calc = h.supervisor.launch("calc", LaunchOptions::new()).await.unwrap();
    let window = calc.current_surface().unwrap().id;
    h.supervisor.close_window(window).await.unwrap();

    let again = h.supervisor.launch("calc", LaunchOptions::new()).await.unwrap();

    assert_eq!(again.pid(), calc.pid());
    assert_eq!(h.windows.len(), 1);
    assert_ne!(again.current_surface().unwrap().id, window);
    assert_eq!(h.calc.constructed(), 1);
    assert_eq!(h.menu_bar.active_app().as_deref(), Some("calc"));
}

#[tokio::test]
async fn test_focus_window_activates_owner() {
    let h = Harness::booted().await;
    let notes_probe = h.probe("notes", "Notes");
    let calc = h.supervisor.launch("calc", LaunchOptions::new()).await.unwrap();
    h.supervisor.launch("notes", LaunchOptions::new()).await.unwrap();
    assert_eq!(h.menu_bar.active_app().as_deref(), Some("notes"));

    let window = calc.current_surface().unwrap().id;
    h.supervisor.focus_window(window).unwrap();

    assert_eq!(h.menu_bar.active_app().as_deref(), Some("calc"));
    assert_eq!(h.menu_bar.active_pid(), calc.pid());
    assert_eq!(h.windows.active_surface(), Some(window));
    assert_eq!(notes_probe.initialized(), 1);
}

#[tokio::test]
async fn test_focus_unknown_window_fails() {
    let h = Harness::booted().await;
    let err = h.supervisor.focus_window(31).unwrap_err();
    assert_eq!(err, SupervisorError::Window(WindowError::SurfaceNotFound(31)));
}

#[tokio::test]
async fn test_window_creation_failure_keeps_process() {
    let h = Harness::booted().await;
    h.windows.fail_creates(true);

    let err = h
        .supervisor
        .launch("calc", LaunchOptions::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        SupervisorError::Window(WindowError::CreateFailed { .. })
    ));
    assert!(h.supervisor.is_running("calc"));
    assert_eq!(h.calc.initialized(), 0);

    h.windows.fail_creates(false);
    let surface = h.supervisor.open_window("calc").await.unwrap();
    assert_eq!(h.windows.len(), 1);
    assert_eq!(h.windows.active_surface(), Some(surface.id));
}
