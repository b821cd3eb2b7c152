//! Базовые компоненты акторов: Actor, ActorRng, FactionRelations

use std::collections::HashMap;

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::ai::Relationship;

/// Актор (NPC, squad member): базовый компонент для живых существ
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct Actor {
    /// Stable ID фракции
    pub faction_id: u64,
}

/// Per-actor RNG (movement timer re-roll, follow randomizer)
///
/// Seed выводится из session DeterministicRng при spawn → порядок spawn
/// задаёт весь поток случайности.
#[derive(Component, Debug, Clone)]
pub struct ActorRng(pub ChaCha8Rng);

impl ActorRng {
    pub fn from_seed(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

/// Отношения между фракциями
///
/// Default: своя фракция → Ally, чужая → Enemy. Overrides симметричны.
#[derive(Resource, Debug, Clone, Default)]
pub struct FactionRelations {
    overrides: HashMap<(u64, u64), Relationship>,
}

impl FactionRelations {
    pub fn set(&mut self, a: u64, b: u64, relationship: Relationship) {
        self.overrides.insert(Self::key(a, b), relationship);
    }

    pub fn relationship(&self, a: u64, b: u64) -> Relationship {
        if let Some(relationship) = self.overrides.get(&Self::key(a, b)) {
            return *relationship;
        }
        if a == b {
            Relationship::Ally
        } else {
            Relationship::Enemy
        }
    }

    fn key(a: u64, b: u64) -> (u64, u64) {
        (a.min(b), a.max(b))
    }
}
