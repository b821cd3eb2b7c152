//! PerceptionSnapshot — sensed facts от perception collaborator
//!
//! Line-of-sight и spatial search живут снаружи (physics/presentation layer).
//! Collaborator пишет snapshot один раз перед FixedUpdate chain, AI системы
//! только читают. Отсутствующая entity = не видна / дистанции нет.

use std::collections::{HashMap, HashSet};

use bevy::prelude::*;

#[derive(Resource, Debug, Clone, Default)]
pub struct PerceptionSnapshot {
    positions: HashMap<Entity, Vec3>,
    /// (observer, target)
    visible: HashSet<(Entity, Entity)>,
    nearby: HashMap<Entity, Vec<Entity>>,
}

impl PerceptionSnapshot {
    pub fn set_position(&mut self, entity: Entity, position: Vec3) {
        self.positions.insert(entity, position);
    }

    pub fn set_visible(&mut self, observer: Entity, target: Entity, visible: bool) {
        if visible {
            self.visible.insert((observer, target));
        } else {
            self.visible.remove(&(observer, target));
        }
    }

    pub fn set_nearby(&mut self, observer: Entity, nearby: Vec<Entity>) {
        self.nearby.insert(observer, nearby);
    }

    /// Entity despawned → убрать все упоминания
    pub fn forget(&mut self, entity: Entity) {
        self.positions.remove(&entity);
        self.nearby.remove(&entity);
        self.visible
            .retain(|(observer, target)| *observer != entity && *target != entity);
        for list in self.nearby.values_mut() {
            list.retain(|e| *e != entity);
        }
    }

    pub fn clear(&mut self) {
        self.positions.clear();
        self.visible.clear();
        self.nearby.clear();
    }

    pub fn is_visible(&self, observer: Entity, target: Entity) -> bool {
        self.visible.contains(&(observer, target))
    }

    pub fn position(&self, entity: Entity) -> Option<Vec3> {
        self.positions.get(&entity).copied()
    }

    pub fn distance(&self, a: Entity, b: Entity) -> Option<f32> {
        Some(self.position(a)?.distance(self.position(b)?))
    }

    /// Порядок как записал collaborator
    pub fn nearby(&self, observer: Entity) -> &[Entity] {
        self.nearby.get(&observer).map(Vec::as_slice).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_entities_degrade() {
        let snapshot = PerceptionSnapshot::default();
        let (a, b) = (Entity::from_raw(1), Entity::from_raw(2));

        assert!(!snapshot.is_visible(a, b));
        assert_eq!(snapshot.distance(a, b), None);
        assert!(snapshot.nearby(a).is_empty());
    }

    #[test]
    fn test_visibility_is_directed() {
        let mut snapshot = PerceptionSnapshot::default();
        let (a, b) = (Entity::from_raw(1), Entity::from_raw(2));
        snapshot.set_visible(a, b, true);

        assert!(snapshot.is_visible(a, b));
        assert!(!snapshot.is_visible(b, a));
    }

    #[test]
    fn test_forget_removes_entity_everywhere() {
        let mut snapshot = PerceptionSnapshot::default();
        let (a, b) = (Entity::from_raw(1), Entity::from_raw(2));
        snapshot.set_position(a, Vec3::ZERO);
        snapshot.set_position(b, Vec3::new(3.0, 0.0, 4.0));
        snapshot.set_visible(a, b, true);
        snapshot.set_nearby(a, vec![b]);
        assert_eq!(snapshot.distance(a, b), Some(5.0));

        snapshot.forget(b);
        assert!(!snapshot.is_visible(a, b));
        assert!(snapshot.nearby(a).is_empty());
        assert_eq!(snapshot.distance(a, b), None);
    }
}
