//! Regen система + финализация смерти (Dying → Dead)

use bevy::prelude::*;

use crate::vitals::{PoolEvent, ResourceEvent, ResourcePool};

/// Компонент-маркер: пул дошёл до Dead
///
/// Presentation использует для fade-out. Деспавн не автоматический.
#[derive(Component, Debug)]
pub struct Dead;

/// Система: regen всех пулов + отсчёт death_delay
///
/// Работает в FixedUpdate для детерминизма. Сдвинутые regen'ом gauges
/// публикуются как *Changed, чтобы presentation не отставала.
pub fn regenerate_resources(
    mut commands: Commands,
    mut pools: Query<(Entity, &mut ResourcePool), Without<Dead>>,
    mut events_out: EventWriter<ResourceEvent>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut pool) in pools.iter_mut() {
        let outcome = pool.tick(delta);
        for event in outcome.changed {
            if let PoolEvent::Changed { gauge, percent } = event {
                events_out.write(ResourceEvent::changed(entity, gauge, percent));
            }
        }

        if outcome.finished_dying {
            commands.entity(entity).insert(Dead);
            crate::log_info(&format!("⚰️ {:?} Dying → Dead", entity));
        }
    }
}
