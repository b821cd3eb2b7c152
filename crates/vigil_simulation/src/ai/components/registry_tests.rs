//! Tests for TargetRegistry (unit + proptest counters).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;
    use proptest::prelude::*;

    use super::super::registry::{Relationship, TargetRegistry, TargetingConfig};

    fn e(index: u32) -> Entity {
        Entity::from_raw(index)
    }

    fn registry(lost_timeout: f32) -> TargetRegistry {
        TargetRegistry::from_config(&TargetingConfig { lost_timeout }).unwrap()
    }

    fn assert_counters_consistent(registry: &TargetRegistry) {
        let ids = registry.tracked();
        let allies = ids
            .iter()
            .filter(|id| registry.relationship_of(**id) == Relationship::Ally)
            .count();
        let enemies = ids
            .iter()
            .filter(|id| registry.relationship_of(**id) == Relationship::Enemy)
            .count();

        assert_eq!(registry.ally_count(), allies);
        assert_eq!(registry.enemy_count(), enemies);
        assert_eq!(
            registry.ally_count() + registry.enemy_count() + registry.other_count(),
            registry.len()
        );
    }

    #[test]
    fn test_track_updates_relationship_counters() {
        let mut registry = registry(5.0);
        registry.track(e(1), Relationship::Enemy, 1.0);
        registry.track(e(2), Relationship::Ally, 1.0);
        registry.track(e(3), Relationship::Neutral, 1.0);

        assert_eq!(registry.enemy_count(), 1);
        assert_eq!(registry.ally_count(), 1);
        assert_eq!(registry.other_count(), 1);

        // Re-track с другим relationship
        registry.track(e(1), Relationship::Ally, 1.0);
        assert_eq!(registry.enemy_count(), 0);
        assert_eq!(registry.ally_count(), 2);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_untrack_unknown_is_noop() {
        let mut registry = registry(5.0);
        assert!(registry.untrack(e(9)).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_tick_expires_entries() {
        let mut registry = registry(1.0);
        registry.track(e(1), Relationship::Enemy, 1.0);
        registry.track(e(2), Relationship::Enemy, 1.0);

        assert!(registry.tick(0.5).is_empty());
        registry.refresh(e(2));

        assert_eq!(registry.tick(0.5), vec![e(1)]);
        assert_eq!(registry.enemy_count(), 1);
        assert_eq!(registry.tick(0.5), vec![e(2)]);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_track_resets_lost_timer() {
        let mut registry = registry(1.0);
        registry.track(e(1), Relationship::Enemy, 1.0);
        registry.tick(0.75);
        registry.track(e(1), Relationship::Enemy, 2.0);

        assert_eq!(registry.get(e(1)).unwrap().lost_timer, 1.0);
        assert_eq!(registry.get(e(1)).unwrap().priority, 2.0);
    }

    #[test]
    fn test_select_highest_priority_ignores_untracked() {
        let mut registry = registry(5.0);
        registry.track(e(1), Relationship::Enemy, 0.5);
        registry.track(e(2), Relationship::Enemy, 0.9);

        assert_eq!(registry.select_highest_priority([e(1), e(2), e(3)]), Some(e(2)));
        assert_eq!(registry.select_highest_priority([e(1)]), Some(e(1)));
        assert_eq!(registry.select_highest_priority([e(3)]), None);
    }

    #[test]
    fn test_select_tie_breaks_on_smallest_entity() {
        let mut registry = registry(5.0);
        registry.track(e(5), Relationship::Enemy, 1.0);
        registry.track(e(3), Relationship::Enemy, 1.0);
        registry.track(e(4), Relationship::Enemy, 1.0);

        assert_eq!(registry.select_highest_priority([e(5), e(4), e(3)]), Some(e(3)));
        assert_eq!(registry.select_highest_priority([e(3), e(5), e(4)]), Some(e(3)));
        assert_eq!(registry.highest_priority_enemy(), Some(e(3)));
    }

    #[test]
    fn test_highest_priority_enemy_skips_allies() {
        let mut registry = registry(5.0);
        registry.track(e(1), Relationship::Ally, 10.0);
        registry.track(e(2), Relationship::Enemy, 0.1);

        assert_eq!(registry.highest_priority_enemy(), Some(e(2)));
        assert_eq!(registry.relationship_of(e(7)), Relationship::Unset);
    }

    #[test]
    fn test_negative_timeout_rejected() {
        assert!(TargetRegistry::from_config(&TargetingConfig { lost_timeout: -1.0 }).is_err());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Track(u32, Relationship, f32),
        Untrack(u32),
        Tick(f32),
    }

    fn relationship() -> impl Strategy<Value = Relationship> {
        prop_oneof![
            Just(Relationship::Unset),
            Just(Relationship::Ally),
            Just(Relationship::Enemy),
            Just(Relationship::Neutral),
        ]
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (0u32..8, relationship(), 0.0f32..10.0).prop_map(|(id, r, p)| Op::Track(id, r, p)),
            (0u32..8).prop_map(Op::Untrack),
            (0.0f32..2.0).prop_map(Op::Tick),
        ]
    }

    proptest! {
        #[test]
        fn prop_counters_match_table(ops in prop::collection::vec(op(), 0..64)) {
            let mut registry = registry(3.0);
            for op in ops {
                match op {
                    Op::Track(id, r, p) => registry.track(e(id), r, p),
                    Op::Untrack(id) => { registry.untrack(e(id)); }
                    Op::Tick(dt) => { registry.tick(dt); }
                }
                assert_counters_consistent(&registry);
            }
        }

        #[test]
        fn prop_selection_order_independent(
            priorities in prop::collection::vec(0u8..4, 1..8),
        ) {
            let mut registry = registry(3.0);
            for (index, priority) in priorities.iter().enumerate() {
                registry.track(e(index as u32), Relationship::Enemy, *priority as f32);
            }

            let forward: Vec<Entity> = (0..priorities.len() as u32).map(e).collect();
            let mut reversed = forward.clone();
            reversed.reverse();

            let a = registry.select_highest_priority(forward);
            let b = registry.select_highest_priority(reversed);
            prop_assert_eq!(a, b);

            let max = *priorities.iter().max().unwrap();
            let expected = priorities.iter().position(|p| *p == max).unwrap() as u32;
            prop_assert_eq!(a, Some(e(expected)));
        }
    }
}
