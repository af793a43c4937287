/*!
 * Application Traits
 * The contract every application implements, and what it gets back from the runtime
 */

use super::manifest::AppManifest;
use crate::lifecycle::LifecycleSupervisor;
use crate::window::SurfaceHandle;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Weak};

/// Future returned by application hooks
pub type HookFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send + 'a>>;

/// Lifecycle hooks of an application
///
/// The supervisor calls `initialize` once per window it opens for the
/// instance and `cleanup` once when the instance terminates. Nothing else in
/// the application is ever touched by the runtime.
pub trait Application: Send + Sync {
    fn initialize<'a>(&'a self, surface: &'a SurfaceHandle) -> HookFuture<'a>;

    fn cleanup(&self) -> HookFuture<'_>;
}

/// Constructor registered for an application id
pub type AppFactory = Arc<dyn Fn(AppContext) -> Box<dyn Application> + Send + Sync>;

/// Wrap a constructor closure into an [`AppFactory`]
pub fn factory<F, A>(constructor: F) -> AppFactory
where
    F: Fn(AppContext) -> A + Send + Sync + 'static,
    A: Application + 'static,
{
    Arc::new(move |context| Box::new(constructor(context)) as Box<dyn Application>)
}

/// Handed to an application when its instance is constructed
///
/// Gives the application its manifest and a handle back into the supervisor
/// so it can launch, terminate or close windows. The handle is weak: an
/// application never keeps the runtime alive.
#[derive(Clone)]
pub struct AppContext {
    manifest: Arc<AppManifest>,
    supervisor: Weak<LifecycleSupervisor>,
}

impl AppContext {
    pub fn new(manifest: Arc<AppManifest>, supervisor: Weak<LifecycleSupervisor>) -> Self {
        Self {
            manifest,
            supervisor,
        }
    }

    pub fn manifest(&self) -> &Arc<AppManifest> {
        &self.manifest
    }

    pub fn app_id(&self) -> &str {
        &self.manifest.id
    }

    /// None once the runtime has shut down
    pub fn supervisor(&self) -> Option<Arc<LifecycleSupervisor>> {
        self.supervisor.upgrade()
    }
}

impl fmt::Debug for AppContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppContext")
            .field("app_id", &self.manifest.id)
            .field("attached", &(self.supervisor.strong_count() > 0))
            .finish()
    }
}
