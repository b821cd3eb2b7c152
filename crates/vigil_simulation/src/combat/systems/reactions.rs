//! Combat reactions на ResourceEvent (death, flee evaluation).

use bevy::prelude::*;

use crate::combat::{CombatCoordinator, CombatEvent, CombatState};
use crate::vitals::ResourceEvent;

/// System: реакция combat layer на события ResourcePool
///
/// - ActorDeath → coordinator disabled (Inactive, запросы отклоняются)
/// - EvaluateFleeing → если в бою и health percent < flee_health_threshold → Fleeing
///
/// Flee policy живёт здесь, не в ResourcePool: пул только сообщает о резкой
/// потере health.
pub fn react_to_resource_events(
    mut resource_events: EventReader<ResourceEvent>,
    mut coordinators: Query<&mut CombatCoordinator>,
    mut combat_events: EventWriter<CombatEvent>,
) {
    for event in resource_events.read() {
        match *event {
            ResourceEvent::ActorDeath { actor } => {
                let Ok(mut coordinator) = coordinators.get_mut(actor) else {
                    continue;
                };
                let from = coordinator.state();
                coordinator.disable();
                crate::log(&format!("Actor {:?} died → combat disabled", actor));

                if from != CombatState::Inactive {
                    combat_events.write(CombatEvent::StateChanged {
                        actor,
                        from,
                        to: CombatState::Inactive,
                    });
                }
            }
            ResourceEvent::EvaluateFleeing { actor, percent } => {
                let Ok(mut coordinator) = coordinators.get_mut(actor) else {
                    continue;
                };
                if !should_flee(&coordinator, percent) {
                    continue;
                }

                let from = coordinator.state();
                if coordinator.request_state(CombatState::Fleeing) {
                    crate::log(&format!(
                        "🏃 {:?} health {:.0}% → Fleeing",
                        actor,
                        percent * 100.0
                    ));
                    combat_events.write(CombatEvent::StateChanged {
                        actor,
                        from,
                        to: CombatState::Fleeing,
                    });
                }
            }
            _ => {}
        }
    }
}

/// Flee policy: бежим только из боя и только ниже порога
pub fn should_flee(coordinator: &CombatCoordinator, health_percent: f32) -> bool {
    coordinator.is_in_combat() && health_percent < coordinator.config().flee_health_threshold
}
