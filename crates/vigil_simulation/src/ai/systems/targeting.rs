//! Targeting systems: PerceptionSnapshot → TargetRegistry.

use bevy::prelude::*;

use crate::ai::{AIEvent, PerceptionSnapshot, Relationship, TargetRegistry};
use crate::components::{Actor, FactionRelations};
use crate::vitals::ResourcePool;

/// Priority множитель для врагов (враг на 10м важнее союзника на 4м)
const ENEMY_PRIORITY_WEIGHT: f32 = 2.0;

/// Система: трекинг видимых nearby акторов
///
/// Relationship из FactionRelations, priority = 1/(1+distance), враги ×2.
/// Мёртвые и despawned цели выкидываются сразу (perception не сообщает о смерти).
pub fn track_perceived_targets(
    mut observers: Query<(Entity, &Actor, &mut TargetRegistry)>,
    targets: Query<(&Actor, Option<&ResourcePool>)>,
    snapshot: Res<PerceptionSnapshot>,
    relations: Res<FactionRelations>,
) {
    for (observer, observer_actor, mut registry) in observers.iter_mut() {
        for &target in snapshot.nearby(observer) {
            if target == observer || !snapshot.is_visible(observer, target) {
                continue;
            }
            let Ok((target_actor, pool)) = targets.get(target) else {
                continue;
            };
            if pool.is_some_and(|p| !p.is_alive()) {
                continue;
            }

            let relationship =
                relations.relationship(observer_actor.faction_id, target_actor.faction_id);
            let distance = snapshot.distance(observer, target).unwrap_or(f32::MAX);
            let mut priority = 1.0 / (1.0 + distance);
            if relationship == Relationship::Enemy {
                priority *= ENEMY_PRIORITY_WEIGHT;
            }

            if !registry.contains(target) {
                crate::log(&format!(
                    "👁️ {:?} tracks {:?} as {:?} (faction {} vs {})",
                    observer,
                    target,
                    relationship,
                    observer_actor.faction_id,
                    target_actor.faction_id
                ));
            }
            registry.track(target, relationship, priority);
        }

        // Очищаем мёртвые/despawned
        let invalid: Vec<Entity> = registry
            .tracked()
            .into_iter()
            .filter(|id| {
                targets
                    .get(*id)
                    .map(|(_, pool)| pool.is_some_and(|p| !p.is_alive()))
                    .unwrap_or(true)
            })
            .collect();
        for id in invalid {
            registry.untrack(id);
        }
    }
}

/// Система: decay lost таймеров в TargetRegistry
pub fn tick_target_registries(
    mut registries: Query<(Entity, &mut TargetRegistry)>,
    mut ai_events: EventWriter<AIEvent>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (observer, mut registry) in registries.iter_mut() {
        for target in registry.tick(delta) {
            crate::log(&format!("👻 {:?} forgot {:?} (lost timeout)", observer, target));
            ai_events.write(AIEvent::TargetForgotten { observer, target });
        }
    }
}
