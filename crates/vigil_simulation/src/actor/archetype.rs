//! ActorArchetype — load-time параметры актора
//!
//! Один archetype на тип NPC (grunt, scout, heavy). Загружается через serde
//! (RON/JSON на стороне хоста), валидируется до spawn.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::ai::{
    DetectionConfig, DetectionTracker, FollowConfig, FollowCoordinator, TargetRegistry,
    TargetingConfig,
};
use crate::combat::{CombatConfig, CombatCoordinator};
use crate::components::{Actor, ActorRng};
use crate::error::ConfigurationError;
use crate::vitals::{ResourcePool, VitalsConfig};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ActorArchetype {
    pub name: String,
    pub vitals: VitalsConfig,
    pub combat: CombatConfig,
    pub detection: DetectionConfig,
    pub targeting: TargetingConfig,
    pub follow: FollowConfig,
}

impl ActorArchetype {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.vitals.validate()?;
        self.combat.validate()?;
        self.detection.validate()?;
        self.targeting.validate()?;
        self.follow.validate()
    }

    /// Все компоненты актора. Пулы на max, FSM'ы в начальных состояниях
    pub fn bundle(&self, faction_id: u64, seed: u64) -> Result<ActorBundle, ConfigurationError> {
        Ok(ActorBundle {
            name: Name::new(self.name.clone()),
            actor: Actor { faction_id },
            rng: ActorRng::from_seed(seed),
            pool: ResourcePool::from_config(&self.vitals)?,
            combat: CombatCoordinator::from_config(&self.combat)?,
            detection: DetectionTracker::from_config(&self.detection)?,
            targets: TargetRegistry::from_config(&self.targeting)?,
            follow: FollowCoordinator::from_config(&self.follow)?,
        })
    }
}

#[derive(Bundle)]
pub struct ActorBundle {
    pub name: Name,
    pub actor: Actor,
    pub rng: ActorRng,
    pub pool: ResourcePool,
    pub combat: CombatCoordinator,
    pub detection: DetectionTracker,
    pub targets: TargetRegistry,
    pub follow: FollowCoordinator,
}
