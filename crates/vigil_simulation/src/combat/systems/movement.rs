//! Combat request + movement timer systems.

use bevy::prelude::*;

use crate::combat::{CombatCoordinator, CombatEvent, CombatRequest};
use crate::components::ActorRng;

/// Система: применение CombatRequest от AI decision layer
///
/// SelectMovement перекатывает таймер через per-actor RNG (детерминизм).
pub fn apply_combat_requests(
    mut requests: EventReader<CombatRequest>,
    mut coordinators: Query<(&mut CombatCoordinator, &mut ActorRng)>,
    mut combat_events: EventWriter<CombatEvent>,
) {
    for request in requests.read() {
        match *request {
            CombatRequest::SetState { actor, state } => {
                let Ok((mut coordinator, _)) = coordinators.get_mut(actor) else {
                    continue;
                };
                let from = coordinator.state();
                if coordinator.request_state(state) {
                    crate::log(&format!("⚔️ {:?} combat {:?} → {:?}", actor, from, state));
                    combat_events.write(CombatEvent::StateChanged {
                        actor,
                        from,
                        to: state,
                    });
                }
            }
            CombatRequest::SelectMovement { actor, movement } => {
                let Ok((mut coordinator, mut rng)) = coordinators.get_mut(actor) else {
                    continue;
                };
                if coordinator.select_movement(movement, &mut rng.0) {
                    crate::log(&format!(
                        "{:?} movement {:?} ({:.2}s)",
                        actor,
                        movement,
                        coordinator.movement_timer()
                    ));
                }
            }
        }
    }
}

/// Система: countdown movement таймеров
///
/// Истёкший таймер → CombatEvent::MovementExpired. Новый тип не выбираем.
pub fn tick_combat_movement(
    mut coordinators: Query<(Entity, &mut CombatCoordinator)>,
    mut combat_events: EventWriter<CombatEvent>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, mut coordinator) in coordinators.iter_mut() {
        if coordinator.tick(delta) {
            combat_events.write(CombatEvent::MovementExpired {
                actor: entity,
                movement: coordinator.movement(),
            });
        }
    }
}
