//! AI Events — уведомления sensing/follow layer для AI decision layer и presentation

use bevy::prelude::*;

use super::{DetectionState, FollowState};

#[derive(Event, Debug, Clone, PartialEq)]
pub enum AIEvent {
    /// DetectionTracker сменил состояние
    DetectionChanged {
        observer: Entity,
        target: Option<Entity>,
        from: DetectionState,
        to: DetectionState,
    },

    /// TargetRegistry выкинул цель по lost timeout
    TargetForgotten { observer: Entity, target: Entity },

    FollowStateChanged {
        actor: Entity,
        from: FollowState,
        to: FollowState,
    },
}
