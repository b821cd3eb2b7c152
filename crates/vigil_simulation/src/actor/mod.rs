//! Actor assembly — единственная точка сборки компонентов актора
//!
//! Все зависимости (configs, RNG seed, faction) передаются явно при spawn,
//! никакого runtime поиска компонентов.

pub mod archetype;

pub use archetype::*;

use bevy::prelude::*;

use crate::error::ConfigurationError;

/// Spawn актора по archetype
///
/// Seed берётся из session DeterministicRng (`DeterministicRng::next_actor_seed`).
/// Невалидный archetype → ConfigurationError, entity не создаётся.
pub fn spawn_actor(
    commands: &mut Commands,
    archetype: &ActorArchetype,
    faction_id: u64,
    seed: u64,
) -> Result<Entity, ConfigurationError> {
    let bundle = archetype.bundle(faction_id, seed)?;
    let entity = commands.spawn(bundle).id();

    crate::log(&format!(
        "Spawned {:?} '{}' (faction {})",
        entity, archetype.name, faction_id
    ));
    Ok(entity)
}
