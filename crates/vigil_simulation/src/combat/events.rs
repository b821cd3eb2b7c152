//! Combat events — запросы AI decision layer и уведомления coordinator'а

use bevy::prelude::*;

use super::{CombatMovementType, CombatState};

/// Запросы от внешнего AI decision layer
///
/// Coordinator валидирует: после смерти и вне боя (для movement) запросы
/// тихо игнорируются (policy no-op).
#[derive(Event, Debug, Clone, PartialEq)]
pub enum CombatRequest {
    SetState {
        actor: Entity,
        state: CombatState,
    },
    SelectMovement {
        actor: Entity,
        movement: CombatMovementType,
    },
}

/// Уведомления combat layer (presentation, AI decision layer)
#[derive(Event, Debug, Clone, PartialEq)]
pub enum CombatEvent {
    StateChanged {
        actor: Entity,
        from: CombatState,
        to: CombatState,
    },
    /// Movement таймер истёк. Следующий тип выбирает AI layer
    MovementExpired {
        actor: Entity,
        movement: CombatMovementType,
    },
}
