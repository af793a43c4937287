/*!
 * Error Types
 * Centralized error handling with thiserror, miette, and serde support
 */

use super::types::{AppId, Pid, WindowId};
use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application registry errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum RegistryError {
    #[error("Application class for '{id}' could not be loaded: {reason}")]
    #[diagnostic(
        code(registry::class_not_found),
        help("The loader for this application failed. The manifest stays registered; retry the registration.")
    )]
    ClassNotFound { id: AppId, reason: String },

    #[error("Application '{0}' is not registered")]
    #[diagnostic(
        code(registry::app_not_registered),
        help("Register a manifest for this application id before resolving it.")
    )]
    AppNotRegistered(AppId),

    #[error("Application '{0}' is registered but its type was never loaded")]
    #[diagnostic(
        code(registry::type_not_loaded),
        help("A previous load attempt failed or never completed.")
    )]
    TypeNotLoaded(AppId),
}

/// Window manager errors
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Diagnostic)]
#[serde(tag = "error_type", content = "details", rename_all = "snake_case")]
pub enum WindowError {
    #[error("Window {0} not found")]
    #[diagnostic(
        code(window::not_found),
        help("The window may already have been closed.")
    )]
    SurfaceNotFound(WindowId),

    #[error("Failed to create window for '{app_id}': {reason}")]
    #[diagnostic(code(window::create_failed))]
    CreateFailed { app_id: AppId, reason: String },

    #[error("Failed to close window {window}: {reason}")]
    #[diagnostic(code(window::close_failed))]
    CloseFailed { window: WindowId, reason: String },
}

/// Lifecycle supervisor errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum SupervisorError {
    #[error("Application '{0}' not found")]
    #[diagnostic(
        code(supervisor::app_not_found),
        help("No manifest is registered for this id. Check the application registry.")
    )]
    AppNotFound(AppId),

    #[error("Application class missing for '{app_id}'")]
    #[diagnostic(
        code(supervisor::app_class_missing),
        help("The manifest exists but no constructible type is available.")
    )]
    AppClassMissing {
        app_id: AppId,
        #[source]
        source: RegistryError,
    },

    #[error("Initialization of '{app_id}' failed: {reason}")]
    #[diagnostic(
        code(supervisor::initialize_failed),
        help("The process stays registered without an initialized window. Retry with open_window.")
    )]
    InitializeFailed { app_id: AppId, reason: String },

    #[error("Termination of '{app_id}' finished with errors: {}", .failures.join("; "))]
    #[diagnostic(
        code(supervisor::terminate_failed),
        help("Bookkeeping was still cleaned up. Some windows may remain open in the window manager.")
    )]
    TerminateFailed {
        app_id: AppId,
        failures: Vec<String>,
    },

    #[error("Process {0} not found")]
    #[diagnostic(
        code(supervisor::process_not_found),
        help("The process may have terminated or never existed. Check PID validity.")
    )]
    ProcessNotFound(Pid),

    #[error("Window error: {0}")]
    #[diagnostic(transparent)]
    Window(#[from] WindowError),
}

/// Configuration errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {reason}")]
    #[diagnostic(code(config::io))]
    Io { path: String, reason: String },

    #[error("Failed to parse config: {0}")]
    #[diagnostic(
        code(config::parse),
        help("The config file must be a JSON object with runtime settings.")
    )]
    Parse(String),

    #[error("Invalid value for {key}: {value}")]
    #[diagnostic(code(config::invalid_value))]
    InvalidValue { key: String, value: String },
}

/// Unified runtime error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum RuntimeError {
    #[error("Registry error: {0}")]
    #[diagnostic(transparent)]
    Registry(#[from] RegistryError),

    #[error("Supervisor error: {0}")]
    #[diagnostic(transparent)]
    Supervisor(#[from] SupervisorError),

    #[error("Config error: {0}")]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),
}

impl From<WindowError> for RuntimeError {
    fn from(err: WindowError) -> Self {
        RuntimeError::Supervisor(SupervisorError::Window(err))
    }
}

pub type RegistryResult<T> = Result<T, RegistryError>;
pub type WindowResult<T> = Result<T, WindowError>;
pub type SupervisorResult<T> = Result<T, SupervisorError>;
