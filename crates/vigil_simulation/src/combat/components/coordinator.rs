//! CombatCoordinator — combat engagement FSM + movement sub-state
//!
//! Переходы CombatState запрашивает AI decision layer (внешний), компонент
//! только валидирует и хранит. Movement sub-state независим: тип + countdown,
//! который перекатывается из [min, max] диапазона типа.

use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// Combat engagement состояния
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum CombatState {
    /// Не в бою (начальное состояние после спавна)
    #[default]
    Inactive,
    /// Активный бой с целью
    Active,
    /// Цель потеряна, ищем (всё ещё "в бою")
    Searching,
    /// Бегство (решение flee policy)
    Fleeing,
    /// Насторожен (что-то услышал/увидел), но не в бою
    Alerted,
}

/// Тип боевого перемещения
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect, Serialize, Deserialize)]
pub enum CombatMovementType {
    PressAttack,
    FallBack,
    #[default]
    HoldPosition,
    FlankRight,
    FlankLeft,
}

/// Диапазон countdown'а (секунды), sample равномерный
#[derive(Debug, Clone, Copy, PartialEq, Reflect, Serialize, Deserialize)]
pub struct TimerRange {
    pub min: f32,
    pub max: f32,
}

impl TimerRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn validate(&self, what: &'static str) -> Result<(), ConfigurationError> {
        // gen_range паникует на бесконечных границах
        for value in [self.min, self.max] {
            if value.is_infinite() {
                return Err(ConfigurationError::NonFinite { what, value });
            }
        }
        if !(self.min >= 0.0) {
            return Err(ConfigurationError::NegativeValue {
                what,
                value: self.min,
            });
        }
        if !(self.min <= self.max) {
            return Err(ConfigurationError::InvertedRange {
                what,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }

    pub fn sample(&self, rng: &mut impl Rng) -> f32 {
        if self.max <= self.min {
            return self.min;
        }
        rng.gen_range(self.min..=self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Параметры combat (часть ActorArchetype)
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub press_attack: TimerRange,
    pub fall_back: TimerRange,
    pub hold_position: TimerRange,
    /// Общий для FlankRight/FlankLeft
    pub flank: TimerRange,
    /// EvaluateFleeing с health percent ниже порога → Fleeing
    pub flee_health_threshold: f32,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            press_attack: TimerRange::new(2.0, 4.0),
            fall_back: TimerRange::new(3.0, 5.0),
            hold_position: TimerRange::new(1.0, 3.0),
            flank: TimerRange::new(2.5, 4.5),
            flee_health_threshold: 0.3, // 30% health
        }
    }
}

impl CombatConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        self.press_attack.validate("press attack timer")?;
        self.fall_back.validate("fall back timer")?;
        self.hold_position.validate("hold position timer")?;
        self.flank.validate("flank timer")?;
        if !(0.0..=1.0).contains(&self.flee_health_threshold) {
            return Err(ConfigurationError::OutOfRange {
                what: "flee health threshold",
                value: self.flee_health_threshold,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(())
    }

    pub fn range_for(&self, movement: CombatMovementType) -> TimerRange {
        match movement {
            CombatMovementType::PressAttack => self.press_attack,
            CombatMovementType::FallBack => self.fall_back,
            CombatMovementType::HoldPosition => self.hold_position,
            CombatMovementType::FlankRight | CombatMovementType::FlankLeft => self.flank,
        }
    }
}

/// Combat coordinator актора
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct CombatCoordinator {
    state: CombatState,
    movement: CombatMovementType,
    /// Инвариант: ≥ 0
    movement_timer: f32,
    movement_expired: bool,
    ranges: CombatConfig,
    /// После смерти запросы отклоняются
    disabled: bool,
}

impl Default for CombatCoordinator {
    fn default() -> Self {
        Self::with_config(CombatConfig::default())
    }
}

impl CombatCoordinator {
    pub fn from_config(config: &CombatConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self::with_config(config.clone()))
    }

    fn with_config(ranges: CombatConfig) -> Self {
        Self {
            state: CombatState::Inactive,
            movement: CombatMovementType::default(),
            movement_timer: 0.0,
            // Пока AI ничего не выбрал: считаем movement истёкшим
            movement_expired: true,
            ranges,
            disabled: false,
        }
    }

    pub fn state(&self) -> CombatState {
        self.state
    }

    /// Запрос перехода от AI decision layer
    ///
    /// Возвращает true если состояние изменилось.
    pub fn request_state(&mut self, state: CombatState) -> bool {
        if self.disabled || self.state == state {
            return false;
        }
        self.state = state;
        true
    }

    pub fn is_in_combat(&self) -> bool {
        matches!(self.state, CombatState::Active | CombatState::Searching)
    }

    pub fn should_attack(&self) -> bool {
        self.is_in_combat()
    }

    pub fn is_fleeing(&self) -> bool {
        self.state == CombatState::Fleeing
    }

    pub fn is_disabled(&self) -> bool {
        self.disabled
    }

    /// Выбрать movement и перекатить таймер из диапазона типа
    ///
    /// Policy no-op (false) вне боя.
    pub fn select_movement(&mut self, movement: CombatMovementType, rng: &mut impl Rng) -> bool {
        if self.disabled || !self.is_in_combat() {
            return false;
        }
        self.movement = movement;
        self.movement_timer = self.ranges.range_for(movement).sample(rng);
        self.movement_expired = self.movement_timer <= 0.0;
        true
    }

    /// Уменьшает таймер. Новый тип НЕ выбирается: только флаг expired
    ///
    /// Возвращает true на тике, когда таймер истёк.
    pub fn tick(&mut self, delta: f32) -> bool {
        if self.movement_expired {
            return false;
        }
        self.movement_timer = (self.movement_timer - delta).max(0.0);
        if self.movement_timer <= 0.0 {
            self.movement_expired = true;
            return true;
        }
        false
    }

    pub fn movement(&self) -> CombatMovementType {
        self.movement
    }

    pub fn movement_timer(&self) -> f32 {
        self.movement_timer
    }

    pub fn is_movement_expired(&self) -> bool {
        self.movement_expired
    }

    pub fn is_advancing(&self) -> bool {
        self.movement == CombatMovementType::PressAttack
    }

    pub fn is_falling_back(&self) -> bool {
        self.movement == CombatMovementType::FallBack
    }

    pub fn is_flanking(&self) -> bool {
        matches!(
            self.movement,
            CombatMovementType::FlankRight | CombatMovementType::FlankLeft
        )
    }

    pub fn config(&self) -> &CombatConfig {
        &self.ranges
    }

    /// Смерть: Inactive навсегда, movement замирает
    pub fn disable(&mut self) {
        self.state = CombatState::Inactive;
        self.movement = CombatMovementType::HoldPosition;
        self.movement_timer = 0.0;
        self.movement_expired = true;
        self.disabled = true;
    }
}
