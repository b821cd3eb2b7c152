//! AI sensing module
//!
//! Per-actor FSM'ы поверх sensed facts (PerceptionSnapshot):
//! - TargetRegistry: кого трекаем, relationship, priority, decay
//! - DetectionTracker: visibility/search FSM для текущей цели
//! - FollowCoordinator: follow behavior + distance band
//!
//! Решения (атаковать, бежать, кого преследовать) принимает внешний
//! AI decision layer через CombatRequest.

use bevy::prelude::*;

pub mod components;
pub mod events;
pub mod perception;
pub mod systems;

pub use components::*;
pub use events::*;
pub use perception::*;
pub use systems::*;

use crate::components::FactionRelations;
use crate::SimulationSet;

/// AI Plugin
///
/// Sensing: targeting → registry decay → detection (detection берёт цель из
/// уже обновлённого registry). Follow в конце тика.
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<AIEvent>()
            .init_resource::<PerceptionSnapshot>()
            .init_resource::<FactionRelations>()
            .add_systems(
                FixedUpdate,
                (
                    track_perceived_targets,
                    tick_target_registries,
                    update_detection,
                )
                    .chain()
                    .in_set(SimulationSet::Sensing),
            )
            .add_systems(FixedUpdate, update_follow.in_set(SimulationSet::Follow));
    }
}
