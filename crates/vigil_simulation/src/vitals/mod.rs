//! Vitals module — ResourcePool актора (health/stamina/magic)
//!
//! ECS ответственность:
//! - Game state: ResourcePool (clamped gauges, DeathState)
//! - Rules: immortal floor, invincible, flee evaluation по относительной потере
//! - Events: ResourceCommand (in) → ResourceEvent (out)
//!
//! Ability/presentation коллабораторы только пишут/читают шину.

use bevy::prelude::*;

use crate::SimulationSet;

pub mod components;
pub mod events;
pub mod systems;

// Re-export основных типов
pub use components::*;
pub use events::{ResourceCommand, ResourceEvent};
pub use systems::{apply_resource_commands, regenerate_resources, Dead};

/// Vitals Plugin
///
/// Порядок выполнения (FixedUpdate):
/// 1. apply_resource_commands: damage/heal/spend с шины
/// 2. regenerate_resources: regen + Dying → Dead
///
/// Combat реакции (ActorDeath, EvaluateFleeing) читают ResourceEvent
/// после этого набора в том же тике: см. CombatPlugin.
pub struct VitalsPlugin;

impl Plugin for VitalsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ResourceCommand>()
            .add_event::<ResourceEvent>()
            .add_systems(
                FixedUpdate,
                (apply_resource_commands, regenerate_resources)
                    .chain()
                    .in_set(SimulationSet::Vitals),
            );
    }
}
