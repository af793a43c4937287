/*!
 * Process Module
 * Process identity, per-process bookkeeping, and application instances
 */

pub mod instance;
pub mod table;
pub mod types;

// Re-export for convenience
pub use instance::{AppInstance, InstanceId};
pub use table::ProcessTable;
pub use types::{ProcessInfo, ProcessStatus};
