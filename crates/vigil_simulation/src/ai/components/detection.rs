//! DetectionTracker — visibility/search FSM для одной цели
//!
//! Inactive → Active (увидели) → Searching (grace истёк) → Lost (поиск истёк)
//! Любое состояние + видим → Active. Grace period на regain таймере гасит
//! flapping Active/Searching от однокадровой окклюзии.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum DetectionState {
    /// Цель ещё ни разу не видели
    #[default]
    Inactive,
    Active,
    Searching,
    /// Терминально, пока цель снова не станет видимой
    Lost,
}

/// Константы таймеров (секунды), сбрасываются при входе в состояние
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Сколько цель считается "только что обнаруженной" после входа в Active
    pub detected_duration: f32,
    /// Grace period: Active держится без видимости
    pub regain_visibility: f32,
    /// Searching до Lost
    pub search_duration: f32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            detected_duration: 1.0,
            regain_visibility: 1.5,
            search_duration: 8.0,
        }
    }
}

impl DetectionConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for (what, value) in [
            ("detected duration", self.detected_duration),
            ("regain visibility timer", self.regain_visibility),
            ("search duration", self.search_duration),
        ] {
            if !(value >= 0.0) {
                return Err(ConfigurationError::NegativeValue { what, value });
            }
        }
        Ok(())
    }
}

#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct DetectionTracker {
    target: Option<Entity>,
    state: DetectionState,
    detected_timer: f32,
    regain_timer: f32,
    search_timer: f32,
    config: DetectionConfig,
}

impl DetectionTracker {
    pub fn from_config(config: &DetectionConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            ..Default::default()
        })
    }

    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    /// Новая цель → Inactive (старые таймеры к ней не относятся)
    pub fn set_target(&mut self, target: Entity) {
        if self.target != Some(target) {
            self.target = Some(target);
            self.reset();
        }
    }

    pub fn clear_target(&mut self) {
        self.target = None;
        self.reset();
    }

    fn reset(&mut self) {
        self.state = DetectionState::Inactive;
        self.detected_timer = 0.0;
        self.regain_timer = 0.0;
        self.search_timer = 0.0;
    }

    pub fn state(&self) -> DetectionState {
        self.state
    }

    /// Цель в Active и detected countdown ещё идёт
    pub fn is_freshly_detected(&self) -> bool {
        self.state == DetectionState::Active && self.detected_timer > 0.0
    }

    pub fn regain_timer(&self) -> f32 {
        self.regain_timer
    }

    pub fn search_timer(&self) -> f32 {
        self.search_timer
    }

    /// Один тик FSM. Возвращает новое состояние, если был переход
    pub fn update(&mut self, is_visible: bool, delta: f32) -> Option<DetectionState> {
        let previous = self.state;

        if is_visible {
            if self.state == DetectionState::Active {
                self.detected_timer = (self.detected_timer - delta).max(0.0);
            } else {
                self.detected_timer = self.config.detected_duration;
            }
            self.regain_timer = self.config.regain_visibility;
            self.state = DetectionState::Active;
        } else {
            match self.state {
                DetectionState::Inactive | DetectionState::Lost => {}
                DetectionState::Active => {
                    self.detected_timer = (self.detected_timer - delta).max(0.0);
                    self.regain_timer = (self.regain_timer - delta).max(0.0);
                    if self.regain_timer <= 0.0 {
                        self.state = DetectionState::Searching;
                        self.search_timer = self.config.search_duration;
                    }
                }
                DetectionState::Searching => {
                    self.search_timer = (self.search_timer - delta).max(0.0);
                    if self.search_timer <= 0.0 {
                        self.state = DetectionState::Lost;
                    }
                }
            }
        }

        (self.state != previous).then_some(self.state)
    }
}
