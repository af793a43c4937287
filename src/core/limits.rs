/*!
 * Runtime Limits and Constants
 *
 * Centralized location for runtime-wide defaults. Every value here can be
 * overridden through `RuntimeConfig`.
 */

use std::time::Duration;

// =============================================================================
// PROCESS IDENTITY
// =============================================================================

/// First process identity handed out in a session.
/// Ids below this value are reserved and never issued.
pub const DEFAULT_PID_BASE: u32 = 1000;

// =============================================================================
// DEFAULT APPLICATION
// =============================================================================

/// Identity of the always-running application (file browser / desktop shell)
pub const DEFAULT_APP_ID: &str = "finder";

// =============================================================================
// OBSERVABILITY
// =============================================================================

/// Lifecycle operations slower than this are logged as warnings
pub const SLOW_OPERATION_THRESHOLD: Duration = Duration::from_millis(10);

// =============================================================================
// ENVIRONMENT VARIABLES
// =============================================================================

/// Path of an optional JSON config file read by the binary
pub const ENV_CONFIG: &str = "DESKTOP_CONFIG";
pub const ENV_DEFAULT_APP: &str = "DESKTOP_DEFAULT_APP";
pub const ENV_PID_BASE: &str = "DESKTOP_PID_BASE";
pub const ENV_SUPERVISION: &str = "DESKTOP_SUPERVISION";
pub const ENV_SLOW_OP_MS: &str = "DESKTOP_SLOW_OP_MS";
pub const ENV_TRACE_JSON: &str = "DESKTOP_TRACE_JSON";
