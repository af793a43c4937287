/*!
 * Window Module
 * Window manager interface and the in-memory implementation
 */

pub mod memory;
pub mod traits;

pub use memory::InMemoryWindowManager;
pub use traits::{SurfaceHandle, WindowFuture, WindowManager};
