/*!
 * Indicators Module
 * Dock and menu bar sinks
 */

pub mod memory;
pub mod traits;

pub use memory::{DockState, MenuBarState};
pub use traits::{ActiveAppIndicator, RunningIndicator};
