/*!
 * Applications Module
 * Application manifests, the application contract, and the registry
 */

pub mod builtin;
pub mod manifest;
pub mod registry;
pub mod traits;

// Re-export for convenience
pub use manifest::AppManifest;
pub use registry::AppRegistry;
pub use traits::{factory, AppContext, AppFactory, Application, HookFuture};
