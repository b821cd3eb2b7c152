//! Vitals components

pub mod pool;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod pool_tests;

// Re-export all components
pub use pool::*;
