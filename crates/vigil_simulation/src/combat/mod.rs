//! Combat coordination module
//!
//! ECS ответственность:
//! - Game state: CombatCoordinator (CombatState + movement sub-state)
//! - Rules: guard predicates, movement timer re-roll, flee policy
//! - Events: CombatRequest (in, от AI decision layer) → CombatEvent (out)
//!
//! Hit resolution, анимации и weapon colliders: внешние коллабораторы.

use bevy::prelude::*;

use crate::SimulationSet;

pub mod components;
pub mod events;
pub mod systems;

// Re-export основных типов
pub use components::*;
pub use events::{CombatEvent, CombatRequest};
pub use systems::{apply_combat_requests, react_to_resource_events, should_flee, tick_combat_movement};

/// Combat Plugin
///
/// Регистрирует combat системы в FixedUpdate.
///
/// Порядок выполнения:
/// 1. apply_combat_requests: запросы AI decision layer (Decision set)
/// 2. tick_combat_movement: countdown movement таймеров (Decision set)
/// 3. react_to_resource_events: ActorDeath / EvaluateFleeing (Reactions set,
///    после vitals чтобы события этого тика доставились в этот же тик)
pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<CombatRequest>()
            .add_event::<CombatEvent>()
            .add_systems(
                FixedUpdate,
                (apply_combat_requests, tick_combat_movement)
                    .chain()
                    .in_set(SimulationSet::Decision),
            )
            .add_systems(
                FixedUpdate,
                react_to_resource_events.in_set(SimulationSet::Reactions),
            );
    }
}
