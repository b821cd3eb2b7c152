//! Follow system: distance band → FollowState.

use bevy::prelude::*;

use crate::ai::{AIEvent, FollowCoordinator, PerceptionSnapshot};

/// Система: пересчёт FollowState
///
/// GoTo меряет дистанцию до goal, остальные behavior до target.
/// Нет позиции / despawned target → Idle.
pub fn update_follow(
    mut followers: Query<(Entity, &mut FollowCoordinator)>,
    snapshot: Res<PerceptionSnapshot>,
    mut ai_events: EventWriter<AIEvent>,
) {
    for (actor, mut follow) in followers.iter_mut() {
        let distance = if follow.is_going_to_goal() {
            snapshot
                .position(actor)
                .map(|position| position.distance(follow.goal()))
        } else {
            follow
                .target()
                .and_then(|target| snapshot.distance(actor, target))
        };

        let from = follow.state();
        if let Some(to) = follow.update(distance) {
            ai_events.write(AIEvent::FollowStateChanged { actor, from, to });
        }
    }
}
