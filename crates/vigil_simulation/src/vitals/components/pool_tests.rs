//! Property tests для ResourcePool (clamping + death инварианты).

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::super::pool::{DeathState, Gauge, PoolEvent, ResourcePool};

    #[derive(Debug, Clone)]
    enum Op {
        Damage(Gauge, f32),
        Heal(Gauge, f32),
        Tick(f32),
    }

    fn gauge() -> impl Strategy<Value = Gauge> {
        prop_oneof![Just(Gauge::Health), Just(Gauge::Stamina), Just(Gauge::Magic)]
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (gauge(), -300.0f32..300.0).prop_map(|(g, a)| Op::Damage(g, a)),
            (gauge(), -300.0f32..300.0).prop_map(|(g, a)| Op::Heal(g, a)),
            (0.0f32..2.0).prop_map(Op::Tick),
        ]
    }

    fn fresh_pool(immortal: bool) -> ResourcePool {
        let mut pool = ResourcePool::default();
        pool.initialize(100.0, 50.0, 75.0).unwrap();
        pool.set_regen_rate(Gauge::Health, 0.02);
        pool.set_regen_rate(Gauge::Stamina, 10.0);
        pool.set_regen_rate(Gauge::Magic, 5.0);
        pool.immortal = immortal;
        pool
    }

    fn run(pool: &mut ResourcePool, op: &Op) -> Vec<PoolEvent> {
        match *op {
            Op::Damage(g, a) => pool.apply_damage(g, a).unwrap(),
            Op::Heal(g, a) => pool.apply_heal(g, a).unwrap(),
            Op::Tick(dt) => {
                pool.tick(dt);
                Vec::new()
            }
        }
    }

    proptest! {
        #[test]
        fn gauges_stay_within_bounds(ops in prop::collection::vec(op(), 1..60)) {
            let mut pool = fresh_pool(false);
            for op in &ops {
                run(&mut pool, op);
                for g in Gauge::ALL {
                    let value = pool.gauge(g);
                    prop_assert!(value.current() >= 0.0);
                    prop_assert!(value.current() <= value.max());
                    prop_assert!((value.percent() - value.current() / value.max()).abs() < 1e-6);
                }
            }
        }

        #[test]
        fn immortal_never_drops_below_floor(ops in prop::collection::vec(op(), 1..60)) {
            let mut pool = fresh_pool(true);
            for op in &ops {
                run(&mut pool, op);
                for g in Gauge::ALL {
                    let value = pool.gauge(g);
                    prop_assert!(value.current() >= value.max() * 0.1 - 1e-4);
                }
                prop_assert_eq!(pool.death_state(), DeathState::Alive);
            }
        }

        #[test]
        fn invincible_pool_never_changes_on_damage(hits in prop::collection::vec((gauge(), -500.0f32..500.0), 1..40)) {
            let mut pool = fresh_pool(false);
            pool.invincible = true;
            for (g, amount) in hits {
                let before = pool.current(g);
                let events = pool.apply_damage(g, amount).unwrap();
                prop_assert!(events.is_empty());
                prop_assert_eq!(pool.current(g), before);
            }
        }

        #[test]
        fn death_transition_happens_once(hits in prop::collection::vec(0.0f32..80.0, 1..40)) {
            let mut pool = fresh_pool(false);
            let mut deaths = 0;
            let mut previous = pool.death_state();
            for amount in hits {
                let events = pool.apply_damage(Gauge::Health, amount).unwrap();
                deaths += events.iter().filter(|e| **e == PoolEvent::Death).count();
                prop_assert!(pool.death_state() >= previous);
                previous = pool.death_state();
            }
            prop_assert!(deaths <= 1);
            prop_assert_eq!(deaths == 1, pool.death_state() == DeathState::Dying);
        }
    }
}
