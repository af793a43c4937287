/*!
 * Lifecycle Module
 * Supervision of application instances: launch, terminate, and window close
 */

pub mod builder;
pub mod context;
pub mod locks;
pub mod options;
pub mod supervisor;

// Re-export public types
pub use builder::SupervisorBuilder;
pub use context::RuntimeContext;
pub use locks::LifecycleLocks;
pub use options::LaunchOptions;
pub use supervisor::{LifecycleSupervisor, ShutdownReport};
