//! General-purpose utility modules.

pub mod error;
pub mod math;

// Re-export commonly used items
pub use error::{Result, WtfError};
