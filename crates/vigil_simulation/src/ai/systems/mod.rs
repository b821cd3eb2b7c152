//! AI systems

pub mod detection;
pub mod follow;
pub mod targeting;

pub use detection::*;
pub use follow::*;
pub use targeting::*;
