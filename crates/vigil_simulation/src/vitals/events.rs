//! Vitals events — шина между ResourcePool и коллабораторами
//!
//! Bevy `Events<T>` = EventBus:
//! - Publish = `EventWriter::write`
//! - Subscribe = система с `EventReader`
//!
//! Доставка синхронная, в порядке публикации, внутри того же FixedUpdate тика
//! (системы `.chain()`). Контракт: handler НЕ публикует тот же kind, который
//! обрабатывает (reentrant циклы шина не ловит).

use bevy::prelude::*;

use super::Gauge;

/// Входящие команды (ability/combat effects → ResourcePool)
#[derive(Event, Debug, Clone, PartialEq)]
pub enum ResourceCommand {
    DamageHealth { actor: Entity, amount: f32 },
    DamageStamina { actor: Entity, amount: f32 },
    DamageMana { actor: Entity, amount: f32 },
    /// Хил любого gauge (зелья, регенерирующие ауры)
    Heal { actor: Entity, gauge: Gauge, amount: f32 },
    /// Оплата действия stamina/magic (только если хватает; Health игнорируется)
    Spend { actor: Entity, gauge: Gauge, cost: f32 },
}

impl ResourceCommand {
    pub fn actor(&self) -> Entity {
        match self {
            Self::DamageHealth { actor, .. }
            | Self::DamageStamina { actor, .. }
            | Self::DamageMana { actor, .. }
            | Self::Heal { actor, .. }
            | Self::Spend { actor, .. } => *actor,
        }
    }
}

/// Исходящие события (ResourcePool → combat layer, presentation)
#[derive(Event, Debug, Clone, PartialEq)]
pub enum ResourceEvent {
    HealthChanged { actor: Entity, percent: f32 },
    StaminaChanged { actor: Entity, percent: f32 },
    MagicChanged { actor: Entity, percent: f32 },
    /// Health дошёл до 0 (Alive → Dying), ровно один раз за жизнь
    ActorDeath { actor: Entity },
    /// Один удар снял > 20% текущего health. Решение о бегстве: в combat layer
    EvaluateFleeing { actor: Entity, percent: f32 },
    /// Публикуют ability collaborators; ядро только пропускает через шину
    TriggerStagger { actor: Entity, severity: f32 },
}

impl ResourceEvent {
    pub fn changed(actor: Entity, gauge: Gauge, percent: f32) -> Self {
        match gauge {
            Gauge::Health => Self::HealthChanged { actor, percent },
            Gauge::Stamina => Self::StaminaChanged { actor, percent },
            Gauge::Magic => Self::MagicChanged { actor, percent },
        }
    }

    pub fn actor(&self) -> Entity {
        match self {
            Self::HealthChanged { actor, .. }
            | Self::StaminaChanged { actor, .. }
            | Self::MagicChanged { actor, .. }
            | Self::ActorDeath { actor }
            | Self::EvaluateFleeing { actor, .. }
            | Self::TriggerStagger { actor, .. } => *actor,
        }
    }
}
