/*!
 * Desktop Runtime Library
 * Application registry, process table, and lifecycle supervision for a
 * multi-application desktop
 */

pub mod apps;
pub mod config;
pub mod core;
pub mod indicators;
pub mod lifecycle;
pub mod monitoring;
pub mod process;
pub mod window;

// Re-exports
pub use apps::{factory, AppContext, AppFactory, AppManifest, AppRegistry, Application, HookFuture};
pub use config::RuntimeConfig;
pub use crate::core::errors::*;
pub use crate::core::types::{AppId, Pid, WindowId};
pub use indicators::{ActiveAppIndicator, DockState, MenuBarState, RunningIndicator};
pub use lifecycle::{LaunchOptions, LifecycleSupervisor, ShutdownReport, SupervisorBuilder};
pub use monitoring::init_tracing;
pub use process::{AppInstance, ProcessInfo, ProcessStatus, ProcessTable};
pub use window::{InMemoryWindowManager, SurfaceHandle, WindowManager};
