//! ResourcePool — health/stamina/magic одного актора
//!
//! Инварианты:
//! - 0 ≤ current ≤ max для каждого gauge (после любой операции)
//! - percent = current / max пересчитывается на каждой мутации
//! - DeathState монотонный: Alive → Dying → Dead (назад не бывает)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, PoolError};

/// Immortal: урон не опускает gauge ниже 10% от max
pub const IMMORTAL_FLOOR_RATIO: f32 = 0.1;

/// Health после удара / health до удара ниже этого → EvaluateFleeing
/// (относительная потеря > 20% текущего health, НЕ 20% от max)
pub const FLEE_EVALUATION_RATIO: f32 = 0.8;

/// Один из трёх gauges актора
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect, Serialize, Deserialize)]
pub enum Gauge {
    Health,
    Stamina,
    Magic,
}

impl Gauge {
    pub const ALL: [Gauge; 3] = [Gauge::Health, Gauge::Stamina, Gauge::Magic];
}

/// Стадия смерти. Порядок важен: сравнения `>= Dying`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Reflect)]
pub enum DeathState {
    #[default]
    Alive,
    /// Health дошёл до 0, играется смерть (health regen/heal заблокированы)
    Dying,
    /// Финал: пул заморожен полностью
    Dead,
}

/// Значение одного gauge (clamped)
#[derive(Debug, Clone, Copy, PartialEq, Default, Reflect)]
pub struct GaugeValue {
    current: f32,
    max: f32,
    /// Health: доля от max в секунду. Stamina/Magic: абсолютные units/sec
    regen_rate: f32,
    percent: f32,
}

impl GaugeValue {
    fn new(max: f32, regen_rate: f32) -> Self {
        Self {
            current: max,
            max,
            regen_rate,
            percent: 1.0,
        }
    }

    pub fn current(&self) -> f32 {
        self.current
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn percent(&self) -> f32 {
        self.percent
    }

    pub fn regen_rate(&self) -> f32 {
        self.regen_rate
    }

    fn set(&mut self, value: f32) {
        self.current = value.clamp(0.0, self.max);
        self.percent = if self.max > 0.0 {
            self.current / self.max
        } else {
            0.0
        };
    }
}

/// Что пул "публикует" после мутации (system переводит в ResourceEvent)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PoolEvent {
    Changed { gauge: Gauge, percent: f32 },
    Death,
    EvaluateFleeing { percent: f32 },
}

/// Load-time параметры пула (часть ActorArchetype)
#[derive(Debug, Clone, PartialEq, Reflect, Serialize, Deserialize)]
#[serde(default)]
pub struct VitalsConfig {
    pub max_health: f32,
    pub max_stamina: f32,
    pub max_magic: f32,
    /// Доля max health в секунду (0.01 = 1%/sec)
    pub health_regen: f32,
    /// Units/sec
    pub stamina_regen: f32,
    /// Units/sec
    pub magic_regen: f32,
    pub invincible: bool,
    pub immortal: bool,
    /// Длительность Dying перед Dead (секунды)
    pub death_delay: f32,
}

impl Default for VitalsConfig {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            max_stamina: 100.0,
            max_magic: 100.0,
            health_regen: 0.0,
            stamina_regen: 10.0,
            magic_regen: 5.0,
            invincible: false,
            immortal: false,
            death_delay: 3.0,
        }
    }
}

impl VitalsConfig {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let maxima = [
            (Gauge::Health, self.max_health),
            (Gauge::Stamina, self.max_stamina),
            (Gauge::Magic, self.max_magic),
        ];
        for (gauge, max) in maxima {
            check_maximum(gauge, max)?;
        }

        let non_negative = [
            ("health regen", self.health_regen),
            ("stamina regen", self.stamina_regen),
            ("magic regen", self.magic_regen),
            ("death delay", self.death_delay),
        ];
        for (what, value) in non_negative {
            if !(value >= 0.0) {
                return Err(ConfigurationError::NegativeValue { what, value });
            }
            // inf · 0 в tick даёт NaN
            if !value.is_finite() {
                return Err(ConfigurationError::NonFinite { what, value });
            }
        }

        Ok(())
    }
}

/// `!(max > 0.0)` ловит и NaN; infinite max даёт NaN percent
fn check_maximum(gauge: Gauge, max: f32) -> Result<(), ConfigurationError> {
    if !(max > 0.0) || !max.is_finite() {
        return Err(ConfigurationError::NonPositiveMaximum { gauge, max });
    }
    Ok(())
}

/// Результат `ResourcePool::tick`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoolTick {
    /// `Changed` для каждого gauge, который regen реально сдвинул
    pub changed: Vec<PoolEvent>,
    /// Пул перешёл Dying → Dead на этом тике
    pub finished_dying: bool,
}

/// Пул ресурсов актора
///
/// Создаётся неинициализированным (`Default`): damage/heal до `initialize`
/// возвращают `PoolError::InvalidOperation`.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct ResourcePool {
    health: GaugeValue,
    stamina: GaugeValue,
    magic: GaugeValue,
    initialized: bool,
    /// Блокирует урон полностью (все gauges)
    pub invincible: bool,
    /// Урон не опускает gauge ниже 10% max
    pub immortal: bool,
    death_state: DeathState,
    death_delay: f32,
    dying_timer: f32,
}

impl ResourcePool {
    /// Пул из archetype конфига (initialize + regen + флаги)
    pub fn from_config(config: &VitalsConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;

        let mut pool = Self::default();
        pool.initialize(config.max_health, config.max_stamina, config.max_magic)?;
        pool.health.regen_rate = config.health_regen;
        pool.stamina.regen_rate = config.stamina_regen;
        pool.magic.regen_rate = config.magic_regen;
        pool.invincible = config.invincible;
        pool.immortal = config.immortal;
        pool.death_delay = config.death_delay;
        Ok(pool)
    }

    /// Все current = max. Повторный вызов = полный reset (включая DeathState)
    pub fn initialize(
        &mut self,
        max_health: f32,
        max_stamina: f32,
        max_magic: f32,
    ) -> Result<(), ConfigurationError> {
        for (gauge, max) in [
            (Gauge::Health, max_health),
            (Gauge::Stamina, max_stamina),
            (Gauge::Magic, max_magic),
        ] {
            check_maximum(gauge, max)?;
        }

        self.health = GaugeValue::new(max_health, self.health.regen_rate);
        self.stamina = GaugeValue::new(max_stamina, self.stamina.regen_rate);
        self.magic = GaugeValue::new(max_magic, self.magic.regen_rate);
        self.death_state = DeathState::Alive;
        self.dying_timer = 0.0;
        self.initialized = true;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn gauge(&self, gauge: Gauge) -> &GaugeValue {
        match gauge {
            Gauge::Health => &self.health,
            Gauge::Stamina => &self.stamina,
            Gauge::Magic => &self.magic,
        }
    }

    fn gauge_mut(&mut self, gauge: Gauge) -> &mut GaugeValue {
        match gauge {
            Gauge::Health => &mut self.health,
            Gauge::Stamina => &mut self.stamina,
            Gauge::Magic => &mut self.magic,
        }
    }

    pub fn current(&self, gauge: Gauge) -> f32 {
        self.gauge(gauge).current
    }

    pub fn percent(&self, gauge: Gauge) -> f32 {
        self.gauge(gauge).percent
    }

    pub fn set_regen_rate(&mut self, gauge: Gauge, rate: f32) {
        self.gauge_mut(gauge).regen_rate = rate.max(0.0);
    }

    pub fn set_invincible(&mut self, invincible: bool) {
        self.invincible = invincible;
    }

    pub fn set_immortal(&mut self, immortal: bool) {
        self.immortal = immortal;
    }

    pub fn death_state(&self) -> DeathState {
        self.death_state
    }

    pub fn is_alive(&self) -> bool {
        self.death_state == DeathState::Alive
    }

    /// Нанести урон gauge
    ///
    /// No-op (пустой Vec): invincible; health при Dying/Dead; stamina/magic при Dead.
    /// Отрицательный amount берётся по модулю.
    pub fn apply_damage(&mut self, gauge: Gauge, amount: f32) -> Result<Vec<PoolEvent>, PoolError> {
        self.ensure_initialized("apply_damage")?;

        if self.invincible || amount.is_nan() {
            return Ok(Vec::new());
        }
        let blocked = match gauge {
            Gauge::Health => self.death_state >= DeathState::Dying,
            Gauge::Stamina | Gauge::Magic => self.death_state == DeathState::Dead,
        };
        if blocked {
            return Ok(Vec::new());
        }

        let amount = amount.abs();
        let immortal = self.immortal;
        let value = self.gauge_mut(gauge);
        let previous = value.current;
        // floor никогда не поднимает значение, которое уже ниже него
        let floor = if immortal {
            (value.max * IMMORTAL_FLOOR_RATIO).min(previous)
        } else {
            0.0
        };
        value.set((previous - amount).max(floor));
        let (current, percent) = (value.current, value.percent);

        let mut events = vec![PoolEvent::Changed { gauge, percent }];

        if gauge == Gauge::Health {
            if current <= 0.0 {
                self.death_state = DeathState::Dying;
                self.dying_timer = self.death_delay;
                events.push(PoolEvent::Death);
            } else if previous > 0.0 && current / previous < FLEE_EVALUATION_RATIO {
                events.push(PoolEvent::EvaluateFleeing { percent });
            }
        }

        Ok(events)
    }

    /// Восстановить gauge (clamp к max). No-op начиная с Dying
    pub fn apply_heal(&mut self, gauge: Gauge, amount: f32) -> Result<Vec<PoolEvent>, PoolError> {
        self.ensure_initialized("apply_heal")?;

        if self.death_state >= DeathState::Dying || amount.is_nan() {
            return Ok(Vec::new());
        }

        let value = self.gauge_mut(gauge);
        let healed = value.current + amount.abs();
        value.set(healed);
        Ok(vec![PoolEvent::Changed {
            gauge,
            percent: value.percent,
        }])
    }

    /// Потратить stamina/magic на действие (только если хватает)
    ///
    /// `Ok(None)`: не хватило, актор мёртв или gauge = Health (health тратится
    /// только через `apply_damage`, иначе мимо death transition и флагов).
    pub fn try_consume(&mut self, gauge: Gauge, cost: f32) -> Result<Option<PoolEvent>, PoolError> {
        self.ensure_initialized("try_consume")?;

        if gauge == Gauge::Health || self.death_state == DeathState::Dead || cost.is_nan() {
            return Ok(None);
        }

        let cost = cost.abs();
        let value = self.gauge_mut(gauge);
        if value.current < cost {
            return Ok(None);
        }
        let remaining = value.current - cost;
        value.set(remaining);
        Ok(Some(PoolEvent::Changed {
            gauge,
            percent: value.percent,
        }))
    }

    /// Regen + отсчёт Dying → Dead
    ///
    /// Changed публикуется только для gauges, которые сдвинулись.
    pub fn tick(&mut self, delta: f32) -> PoolTick {
        let mut outcome = PoolTick::default();
        if !self.initialized || self.death_state == DeathState::Dead {
            return outcome;
        }

        for gauge in Gauge::ALL {
            if gauge == Gauge::Health && self.death_state != DeathState::Alive {
                continue;
            }
            let value = self.gauge_mut(gauge);
            let gain = match gauge {
                Gauge::Health => value.regen_rate * value.max * delta,
                Gauge::Stamina | Gauge::Magic => value.regen_rate * delta,
            };
            let previous = value.current;
            value.set(previous + gain);
            if value.current != previous {
                outcome.changed.push(PoolEvent::Changed {
                    gauge,
                    percent: value.percent,
                });
            }
        }

        if self.death_state == DeathState::Dying {
            self.dying_timer = (self.dying_timer - delta).max(0.0);
            if self.dying_timer <= 0.0 {
                self.death_state = DeathState::Dead;
                outcome.finished_dying = true;
            }
        }

        outcome
    }

    /// Форсировать Dying → Dead (например presentation закончила анимацию)
    pub fn finish_dying(&mut self) -> bool {
        if self.death_state == DeathState::Dying {
            self.death_state = DeathState::Dead;
            self.dying_timer = 0.0;
            true
        } else {
            false
        }
    }

    fn ensure_initialized(&self, operation: &'static str) -> Result<(), PoolError> {
        if self.initialized {
            Ok(())
        } else {
            Err(PoolError::InvalidOperation(operation))
        }
    }
}
