//! Combat systems (strategic layer logic)

pub mod movement;
pub mod reactions;

// Re-export all systems
pub use movement::*;
pub use reactions::*;
