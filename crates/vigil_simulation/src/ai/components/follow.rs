//! FollowCoordinator — follow behavior + distance band FSM
//!
//! Desired distance из behavior, state из текущей дистанции с hysteresis ε:
//! d > D+ε → CatchUp, d < D−ε → Fallback, иначе Idle.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum FollowState {
    #[default]
    Idle,
    CatchUp,
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum FollowBehavior {
    #[default]
    Relaxed,
    KeepClose,
    TakePoint,
    Tail,
    /// Дистанция до goal position, не до target
    GoTo,
}

impl FollowBehavior {
    /// Порядок значим: randomizer берёт всё кроме последнего (GoTo)
    pub const ALL: [FollowBehavior; 5] = [
        FollowBehavior::Relaxed,
        FollowBehavior::KeepClose,
        FollowBehavior::TakePoint,
        FollowBehavior::Tail,
        FollowBehavior::GoTo,
    ];

    /// Множитель distance_max (None → behavior держится у distance_min)
    pub fn max_distance_factor(self) -> Option<f32> {
        match self {
            FollowBehavior::Relaxed => Some(0.6),
            FollowBehavior::TakePoint => Some(0.5),
            FollowBehavior::Tail => Some(0.7),
            FollowBehavior::KeepClose | FollowBehavior::GoTo => None,
        }
    }
}

const CLOSE_DISTANCE_FACTOR: f32 = 1.1;

#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct FollowConfig {
    pub distance_min: f32,
    pub distance_max: f32,
    /// ε: dead zone вокруг desired distance
    pub hysteresis: f32,
}

impl Default for FollowConfig {
    fn default() -> Self {
        Self {
            distance_min: 2.0,
            distance_max: 20.0,
            hysteresis: 1.0,
        }
    }
}

impl FollowConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        if !(self.distance_min >= 0.0) {
            return Err(ConfigurationError::NegativeValue {
                what: "follow distance_min",
                value: self.distance_min,
            });
        }
        if !(self.distance_min <= self.distance_max) {
            return Err(ConfigurationError::InvertedRange {
                what: "follow distance",
                min: self.distance_min,
                max: self.distance_max,
            });
        }
        if !(self.hysteresis >= 0.0) {
            return Err(ConfigurationError::NegativeValue {
                what: "follow hysteresis",
                value: self.hysteresis,
            });
        }
        Ok(())
    }
}

#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct FollowCoordinator {
    /// Weak ссылка: despawn цели → дистанции нет → Idle
    target: Option<Entity>,
    goal: Vec3,
    behavior: FollowBehavior,
    state: FollowState,
    config: FollowConfig,
}

impl FollowCoordinator {
    pub fn from_config(config: &FollowConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            ..Default::default()
        })
    }

    pub fn set_target(&mut self, target: Entity) {
        self.target = Some(target);
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    pub fn set_goal(&mut self, goal: Vec3) {
        self.goal = goal;
    }

    pub fn goal(&self) -> Vec3 {
        self.goal
    }

    pub fn set_behavior(&mut self, behavior: FollowBehavior) {
        self.behavior = behavior;
    }

    pub fn behavior(&self) -> FollowBehavior {
        self.behavior
    }

    pub fn state(&self) -> FollowState {
        self.state
    }

    pub fn config(&self) -> &FollowConfig {
        &self.config
    }

    /// randomize → uniform по всем behavior кроме GoTo, иначе без изменений
    pub fn evaluate_behavior(&mut self, rng: &mut impl Rng, randomize: bool) -> FollowBehavior {
        if randomize {
            let choices = &FollowBehavior::ALL[..FollowBehavior::ALL.len() - 1];
            self.behavior = choices[rng.gen_range(0..choices.len())];
        }
        self.behavior
    }

    pub fn desired_distance(&self) -> f32 {
        match self.behavior.max_distance_factor() {
            Some(factor) => self.config.distance_max * factor,
            None => self.config.distance_min * CLOSE_DISTANCE_FACTOR,
        }
    }

    pub fn is_going_to_goal(&self) -> bool {
        self.behavior == FollowBehavior::GoTo
    }

    /// Пересчёт state по текущей дистанции. Возвращает новый state при смене
    pub fn update(&mut self, distance: Option<f32>) -> Option<FollowState> {
        let previous = self.state;
        let desired = self.desired_distance();
        let epsilon = self.config.hysteresis;

        self.state = match distance {
            Some(d) if d > desired + epsilon => FollowState::CatchUp,
            Some(d) if d < desired - epsilon => FollowState::Fallback,
            _ => FollowState::Idle,
        };

        (self.state != previous).then_some(self.state)
    }
}
