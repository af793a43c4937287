/*!
 * Window Manager Traits
 * The narrow interface the supervisor uses to drive presentation surfaces
 */

use crate::core::errors::WindowResult;
use crate::core::types::WindowId;
use crate::process::AppInstance;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Handle to a created surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurfaceHandle {
    pub id: WindowId,
    pub title: String,
}

/// Future returned by suspending window manager calls
pub type WindowFuture<'a, T> = Pin<Box<dyn Future<Output = WindowResult<T>> + Send + 'a>>;

/// Window manager collaborator
pub trait WindowManager: Send + Sync {
    /// Create a surface bound to `instance`
    fn create_surface<'a>(
        &'a self,
        instance: &'a Arc<AppInstance>,
    ) -> WindowFuture<'a, SurfaceHandle>;

    /// Destroy a surface
    fn close_surface(&self, window: WindowId) -> WindowFuture<'_, ()>;

    /// Bring a surface to the front and give it focus
    fn activate_surface(&self, window: WindowId) -> WindowResult<()>;

    /// Instance owning a live surface
    fn owner_of(&self, window: WindowId) -> Option<Arc<AppInstance>>;

    /// Live surfaces owned by `instance`, ascending
    fn surfaces_of(&self, instance: &AppInstance) -> Vec<WindowId>;
}
