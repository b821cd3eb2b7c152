//! Vitals systems (damage bus + regen)

pub mod damage;
pub mod regen;

// Re-export all systems
pub use damage::*;
pub use regen::*;
