//! AI components

pub mod detection;
pub mod follow;
pub mod registry;

#[cfg(test)]
mod registry_tests;

// Re-export all components
pub use detection::*;
pub use follow::*;
pub use registry::*;
