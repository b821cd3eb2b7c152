//! Damage/heal система: ResourceCommand → ResourcePool → ResourceEvent

use bevy::prelude::*;

use crate::vitals::{Gauge, PoolEvent, ResourceCommand, ResourceEvent, ResourcePool};

/// Система: применение ResourceCommand к пулам
///
/// 1. Читаем команды в порядке публикации
/// 2. Мутируем ResourcePool (policy no-ops тихо игнорируются)
/// 3. Републикуем Changed / ActorDeath / EvaluateFleeing
///
/// InvalidOperation (пул не инициализирован) логируется и команда отбрасывается —
/// у команд с шины нет caller'а, которому можно вернуть ошибку.
pub fn apply_resource_commands(
    mut commands_in: EventReader<ResourceCommand>,
    mut events_out: EventWriter<ResourceEvent>,
    mut pools: Query<&mut ResourcePool>,
) {
    for command in commands_in.read() {
        let actor = command.actor();
        let Ok(mut pool) = pools.get_mut(actor) else {
            crate::log_warning(&format!(
                "ResourceCommand for {:?} ignored: no ResourcePool",
                actor
            ));
            continue;
        };

        let result = match *command {
            ResourceCommand::DamageHealth { amount, .. } => pool.apply_damage(Gauge::Health, amount),
            ResourceCommand::DamageStamina { amount, .. } => pool.apply_damage(Gauge::Stamina, amount),
            ResourceCommand::DamageMana { amount, .. } => pool.apply_damage(Gauge::Magic, amount),
            ResourceCommand::Heal { gauge, amount, .. } => pool.apply_heal(gauge, amount),
            ResourceCommand::Spend { gauge, cost, .. } => {
                pool.try_consume(gauge, cost).map(|event| event.into_iter().collect::<Vec<_>>())
            }
        };

        let pool_events = match result {
            Ok(events) => events,
            Err(err) => {
                crate::log_error(&format!("{:?}: {}", actor, err));
                continue;
            }
        };

        for pool_event in pool_events {
            events_out.write(to_resource_event(actor, pool_event));

            if pool_event == PoolEvent::Death {
                crate::log_info(&format!("💀 {:?} health depleted → Dying", actor));
            }
        }
    }
}

fn to_resource_event(actor: Entity, event: PoolEvent) -> ResourceEvent {
    match event {
        PoolEvent::Changed { gauge, percent } => ResourceEvent::changed(actor, gauge, percent),
        PoolEvent::Death => ResourceEvent::ActorDeath { actor },
        PoolEvent::EvaluateFleeing { percent } => ResourceEvent::EvaluateFleeing { actor, percent },
    }
}
