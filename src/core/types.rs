/*!
 * Core Types
 * Common types used across the runtime
 */

/// Process ID type
pub type Pid = u32;

/// Window (surface) identifier, assigned by the window manager
pub type WindowId = u64;

/// Application identifier as declared in its manifest
pub type AppId = String;
