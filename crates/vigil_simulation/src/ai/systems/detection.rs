//! Detection system: DetectionTracker FSM tick.

use bevy::prelude::*;

use crate::ai::{AIEvent, DetectionState, DetectionTracker, PerceptionSnapshot, TargetRegistry};

/// Система: обновление DetectionTracker по видимости цели
///
/// Нет цели (или цель Lost) → берём самого приоритетного врага из TargetRegistry.
/// Despawned цель = не видна (snapshot её не содержит).
pub fn update_detection(
    mut trackers: Query<(Entity, &mut DetectionTracker, Option<&TargetRegistry>)>,
    snapshot: Res<PerceptionSnapshot>,
    mut ai_events: EventWriter<AIEvent>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (observer, mut tracker, registry) in trackers.iter_mut() {
        let needs_target =
            tracker.target().is_none() || tracker.state() == DetectionState::Lost;
        if needs_target {
            if let Some(enemy) = registry.and_then(TargetRegistry::highest_priority_enemy) {
                tracker.set_target(enemy);
            }
        }

        let visible = tracker
            .target()
            .is_some_and(|target| snapshot.is_visible(observer, target));

        let from = tracker.state();
        if let Some(to) = tracker.update(visible, delta) {
            crate::log(&format!(
                "🔎 {:?} detection {:?} → {:?} (target {:?})",
                observer,
                from,
                to,
                tracker.target()
            ));
            ai_events.write(AIEvent::DetectionChanged {
                observer,
                target: tracker.target(),
                from,
                to,
            });
        }
    }
}
