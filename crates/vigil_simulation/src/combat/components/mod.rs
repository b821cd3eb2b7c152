//! Combat components

pub mod coordinator;


// Re-export all components
pub use coordinator::*;
