//! ECS Components, общие для всех подсистем
//!
//! Доменные компоненты живут в своих модулях (vitals, combat, ai).
//! - actor: faction, per-actor RNG, faction relations

pub mod actor;

pub use actor::*;
