/*!
 * Built-in Applications
 * The applications shipped with the runtime
 */

use super::manifest::AppManifest;
use super::registry::AppRegistry;
use super::traits::{factory, AppContext, AppFactory, Application, HookFuture};
use crate::core::limits::DEFAULT_APP_ID;
use crate::window::SurfaceHandle;
use parking_lot::Mutex;
use tracing::{debug, info};

/// File browser; the always-running default application
pub struct Finder {
    context: AppContext,
    opened: Mutex<u32>,
}

impl Finder {
    pub fn new(context: AppContext) -> Self {
        Self {
            context,
            opened: Mutex::new(0),
        }
    }
}

impl Application for Finder {
    fn initialize<'a>(&'a self, surface: &'a SurfaceHandle) -> HookFuture<'a> {
        Box::pin(async move {
            let mut opened = self.opened.lock();
            *opened += 1;
            info!(
                app_id = self.context.app_id(),
                window = surface.id,
                browsers = *opened,
                "Finder window ready"
            );
            Ok(())
        })
    }

    fn cleanup(&self) -> HookFuture<'_> {
        Box::pin(async move {
            debug!(app_id = self.context.app_id(), "Finder cleanup");
            Ok(())
        })
    }
}

/// Basic four-function calculator
pub struct Calculator {
    context: AppContext,
    display: Mutex<f64>,
}

impl Calculator {
    pub fn new(context: AppContext) -> Self {
        Self {
            context,
            display: Mutex::new(0.0),
        }
    }
}

impl Application for Calculator {
    fn initialize<'a>(&'a self, surface: &'a SurfaceHandle) -> HookFuture<'a> {
        Box::pin(async move {
            *self.display.lock() = 0.0;
            info!(app_id = self.context.app_id(), window = surface.id, "Calculator ready");
            Ok(())
        })
    }

    fn cleanup(&self) -> HookFuture<'_> {
        Box::pin(async move {
            debug!(
                app_id = self.context.app_id(),
                display = *self.display.lock(),
                "Calculator cleanup"
            );
            Ok(())
        })
    }
}

/// Plain text editor; one buffer per window
pub struct TextEdit {
    context: AppContext,
    buffers: Mutex<Vec<(u64, String)>>,
}

impl TextEdit {
    pub fn new(context: AppContext) -> Self {
        Self {
            context,
            buffers: Mutex::new(Vec::new()),
        }
    }
}

impl Application for TextEdit {
    fn initialize<'a>(&'a self, surface: &'a SurfaceHandle) -> HookFuture<'a> {
        Box::pin(async move {
            self.buffers.lock().push((surface.id, String::new()));
            info!(app_id = self.context.app_id(), window = surface.id, "Untitled document opened");
            Ok(())
        })
    }

    fn cleanup(&self) -> HookFuture<'_> {
        Box::pin(async move {
            let dropped = std::mem::take(&mut *self.buffers.lock());
            debug!(app_id = self.context.app_id(), buffers = dropped.len(), "TextEdit cleanup");
            Ok(())
        })
    }
}

/// Manifests and constructors of every built-in application
pub fn catalog() -> Vec<(AppManifest, AppFactory)> {
    vec![
        (
            AppManifest::new(DEFAULT_APP_ID, "Finder").with_icon("icons/finder.png"),
            factory(Finder::new),
        ),
        (
            AppManifest::new("calc", "Calculator").with_icon("icons/calculator.png"),
            factory(Calculator::new),
        ),
        (
            AppManifest::new("textedit", "TextEdit").with_icon("icons/textedit.png"),
            factory(TextEdit::new),
        ),
    ]
}

/// Register the built-in catalog, returning how many applications were added
pub fn register_builtin(registry: &AppRegistry) -> usize {
    let apps = catalog();
    let count = apps.len();
    for (manifest, constructor) in apps {
        registry.register(manifest, constructor);
    }
    count
}
