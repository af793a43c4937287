/*!
 * Core Module
 * Fundamental runtime types, limits and error handling
 */

pub mod errors;
pub mod limits;
pub mod serde;
pub mod types;

// Re-export for convenience
pub use errors::*;
pub use types::*;
