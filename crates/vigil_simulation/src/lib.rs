//! VIGIL Simulation Core
//!
//! Per-actor AI coordination layer на Bevy 0.16 (headless ECS):
//! - vitals: ResourcePool (health/stamina/magic, death transition)
//! - combat: CombatCoordinator (engagement FSM + movement sub-state)
//! - ai: TargetRegistry, DetectionTracker, FollowCoordinator
//!
//! Event bus = Bevy Events. Perception, анимации, hit resolution и pathfinding
//! живут у внешних коллабораторов; сюда приходят только sensed facts
//! (PerceptionSnapshot) и ResourceCommand.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod actor;
pub mod ai;
pub mod combat;
pub mod components;
pub mod error;
pub mod logger;
pub mod vitals;

// Re-export базовых типов для удобства
pub use actor::{spawn_actor, ActorArchetype, ActorBundle};
pub use ai::{AIEvent, AIPlugin, PerceptionSnapshot};
pub use combat::{CombatEvent, CombatPlugin, CombatRequest};
pub use components::{Actor, ActorRng, FactionRelations};
pub use error::{ConfigurationError, PoolError};
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, LogLevel};
pub use vitals::{Dead, ResourceCommand, ResourceEvent, VitalsPlugin};

const SIMULATION_HZ: f64 = 60.0;

/// Порядок подсистем внутри одного FixedUpdate тика
///
/// Sensing → Decision → Vitals → Reactions → Follow. События, опубликованные
/// в наборе, читаются последующими наборами в том же тике.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Perception → TargetRegistry → DetectionTracker
    Sensing,
    /// CombatRequest + movement таймеры
    Decision,
    /// ResourceCommand, regen, Dying → Dead
    Vitals,
    /// Combat реакции на ResourceEvent
    Reactions,
    Follow,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin {
    pub seed: u64,
}

impl Default for SimulationPlugin {
    fn default() -> Self {
        Self { seed: 42 }
    }
}

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ))
            .insert_resource(DeterministicRng::new(self.seed))
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Sensing,
                    SimulationSet::Decision,
                    SimulationSet::Vitals,
                    SimulationSet::Reactions,
                    SimulationSet::Follow,
                )
                    .chain(),
            )
            .add_plugins((VitalsPlugin, CombatPlugin, AIPlugin));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed для ActorRng. Порядок spawn → порядок seed'ов
    pub fn next_actor_seed(&mut self) -> u64 {
        self.rng.next_u64()
    }
}

/// Создаёт minimal Bevy App для headless симуляции
///
/// Время двигается ровно на один fixed step за `app.update()` (кроме первого
/// update, в котором Time ещё не накопил delta), без зависимости от wall clock.
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .add_plugins(SimulationPlugin { seed })
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(
            1.0 / SIMULATION_HZ,
        )));

    app
}

/// Spawn актора прямо в World (тесты, headless demo)
///
/// Seed берётся из DeterministicRng мира.
pub fn spawn_actor_in_world(
    world: &mut World,
    archetype: &ActorArchetype,
    faction_id: u64,
) -> Result<Entity, ConfigurationError> {
    let seed = world.resource_mut::<DeterministicRng>().next_actor_seed();
    let bundle = archetype.bundle(faction_id, seed)?;
    Ok(world.spawn(bundle).id())
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
