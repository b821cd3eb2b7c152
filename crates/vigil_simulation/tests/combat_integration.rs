//! Combat integration test
//!
//! Шина целиком: ResourceCommand → ResourcePool → ResourceEvent → combat реакции
//!
//! Проверяем:
//! - 100 → 70 (EvaluateFleeing 0.7) → 0 (ActorDeath, Dying → Dead)
//! - flee policy по порогу
//! - gauge инварианты под потоком урона/хила

use bevy::prelude::*;
use vigil_simulation::combat::{CombatCoordinator, CombatState};
use vigil_simulation::vitals::{DeathState, Gauge, ResourcePool};
use vigil_simulation::*;

/// Всё, что опубликовано на шину за прогон
#[derive(Resource, Default)]
struct Recorded {
    resource: Vec<ResourceEvent>,
    combat: Vec<CombatEvent>,
}

fn record_events(
    mut recorded: ResMut<Recorded>,
    mut resource_events: EventReader<ResourceEvent>,
    mut combat_events: EventReader<CombatEvent>,
) {
    recorded.resource.extend(resource_events.read().cloned());
    recorded.combat.extend(combat_events.read().cloned());
}

/// Helper: App + recorder после всех simulation наборов
fn create_combat_app(seed: u64) -> App {
    let mut app = create_headless_app(seed);
    app.init_resource::<Recorded>()
        .add_systems(FixedUpdate, record_events.after(SimulationSet::Follow));
    app
}

fn spawn_fighter(app: &mut App, faction_id: u64) -> Entity {
    spawn_actor_in_world(app.world_mut(), &ActorArchetype::named("fighter"), faction_id)
        .expect("default archetype is valid")
}

fn run(app: &mut App, updates: usize) {
    for _ in 0..updates {
        app.update();
    }
}

fn take_recorded(app: &mut App) -> Recorded {
    std::mem::take(&mut *app.world_mut().resource_mut::<Recorded>())
}

fn enter_combat(app: &mut App, actor: Entity) {
    app.world_mut().send_event(CombatRequest::SetState {
        actor,
        state: CombatState::Active,
    });
    run(app, 3);
    assert_eq!(
        app.world().get::<CombatCoordinator>(actor).unwrap().state(),
        CombatState::Active
    );
    take_recorded(app);
}

/// Test: 100 → 70 → 0 сценарий целиком
#[test]
fn test_damage_flee_evaluation_then_death() {
    let mut app = create_combat_app(42);
    let npc = spawn_fighter(&mut app, 1);
    enter_combat(&mut app, npc);

    // 100 → 70: потеря 30% от текущего → EvaluateFleeing(0.7)
    app.world_mut().send_event(ResourceCommand::DamageHealth { actor: npc, amount: 30.0 });
    run(&mut app, 3);

    let recorded = take_recorded(&mut app);
    assert!(recorded
        .resource
        .contains(&ResourceEvent::HealthChanged { actor: npc, percent: 0.7 }));
    assert!(recorded
        .resource
        .contains(&ResourceEvent::EvaluateFleeing { actor: npc, percent: 0.7 }));
    // 0.7 выше порога 0.3 → остаёмся в бою
    assert_eq!(
        app.world().get::<CombatCoordinator>(npc).unwrap().state(),
        CombatState::Active
    );

    // 70 - 75 → clamp к 0: смерть
    app.world_mut().send_event(ResourceCommand::DamageHealth { actor: npc, amount: 75.0 });
    run(&mut app, 3);

    let recorded = take_recorded(&mut app);
    let deaths = recorded
        .resource
        .iter()
        .filter(|e| matches!(e, ResourceEvent::ActorDeath { .. }))
        .count();
    assert_eq!(deaths, 1);
    assert!(recorded
        .resource
        .contains(&ResourceEvent::HealthChanged { actor: npc, percent: 0.0 }));
    assert!(recorded.combat.contains(&CombatEvent::StateChanged {
        actor: npc,
        from: CombatState::Active,
        to: CombatState::Inactive,
    }));

    let pool = app.world().get::<ResourcePool>(npc).unwrap();
    assert_eq!(pool.death_state(), DeathState::Dying);
    assert_eq!(pool.current(Gauge::Health), 0.0);
    assert!(app.world().get::<CombatCoordinator>(npc).unwrap().is_disabled());

    // Dying → Dead через death_delay (3s = 180 тиков)
    run(&mut app, 240);
    let pool = app.world().get::<ResourcePool>(npc).unwrap();
    assert_eq!(pool.death_state(), DeathState::Dead);
    assert!(app.world().get::<Dead>(npc).is_some());

    // Мёртвому запросы не принимаются, урон не доходит
    app.world_mut().send_event(CombatRequest::SetState {
        actor: npc,
        state: CombatState::Active,
    });
    app.world_mut().send_event(ResourceCommand::DamageHealth { actor: npc, amount: 10.0 });
    run(&mut app, 3);
    let recorded = take_recorded(&mut app);
    assert!(recorded.combat.is_empty());
    assert!(recorded.resource.is_empty());
}

/// Test: резкая потеря ниже порога → Fleeing
#[test]
fn test_heavy_hit_below_threshold_triggers_flee() {
    let mut app = create_combat_app(7);
    let npc = spawn_fighter(&mut app, 1);
    enter_combat(&mut app, npc);

    app.world_mut().send_event(ResourceCommand::DamageHealth { actor: npc, amount: 50.0 });
    run(&mut app, 3);
    assert!(!app.world().get::<CombatCoordinator>(npc).unwrap().is_fleeing());

    // 50 → 20: 20/50 < 0.8 → EvaluateFleeing(0.2) < 0.3 → Fleeing
    app.world_mut().send_event(ResourceCommand::DamageHealth { actor: npc, amount: 30.0 });
    run(&mut app, 3);

    let recorded = take_recorded(&mut app);
    assert!(recorded.combat.contains(&CombatEvent::StateChanged {
        actor: npc,
        from: CombatState::Active,
        to: CombatState::Fleeing,
    }));
    assert!(app.world().get::<CombatCoordinator>(npc).unwrap().is_fleeing());
}

/// Test: вне боя EvaluateFleeing публикуется, но бегства нет
#[test]
fn test_flee_evaluation_ignored_outside_combat() {
    let mut app = create_combat_app(7);
    let npc = spawn_fighter(&mut app, 1);
    run(&mut app, 2);

    app.world_mut().send_event(ResourceCommand::DamageHealth { actor: npc, amount: 90.0 });
    run(&mut app, 3);

    let recorded = take_recorded(&mut app);
    assert!(recorded
        .resource
        .iter()
        .any(|e| matches!(e, ResourceEvent::EvaluateFleeing { .. })));
    assert_eq!(
        app.world().get::<CombatCoordinator>(npc).unwrap().state(),
        CombatState::Inactive
    );
}

/// Test: gauge инварианты под смешанным потоком команд
#[test]
fn test_gauge_invariants_under_command_stream() {
    let mut app = create_combat_app(123);
    let npc1 = spawn_fighter(&mut app, 1);
    let npc2 = spawn_fighter(&mut app, 2);

    for tick in 0..300u32 {
        let amount = (tick % 7) as f32 * 1.5;
        let world = app.world_mut();
        world.send_event(ResourceCommand::DamageStamina { actor: npc1, amount });
        world.send_event(ResourceCommand::DamageMana { actor: npc2, amount: -amount });
        world.send_event(ResourceCommand::Heal { actor: npc1, gauge: Gauge::Health, amount });
        world.send_event(ResourceCommand::Spend { actor: npc2, gauge: Gauge::Stamina, cost: 4.0 });
        app.update();

        for npc in [npc1, npc2] {
            let pool = app.world().get::<ResourcePool>(npc).unwrap();
            for gauge in Gauge::ALL {
                let value = pool.gauge(gauge);
                assert!(
                    value.current() >= 0.0 && value.current() <= value.max(),
                    "Tick {}: {:?} {:?} out of [0, {}]",
                    tick,
                    npc,
                    gauge,
                    value.max()
                );
            }
        }
    }
}

/// Test: regen публикует StaminaChanged, Spend по Health игнорируется
#[test]
fn test_regen_and_spend_reach_the_bus() {
    let mut app = create_combat_app(9);
    let npc = spawn_fighter(&mut app, 1);
    run(&mut app, 2);
    take_recorded(&mut app);

    app.world_mut().send_event(ResourceCommand::Spend { actor: npc, gauge: Gauge::Health, cost: 100.0 });
    app.world_mut().send_event(ResourceCommand::Spend { actor: npc, gauge: Gauge::Stamina, cost: 50.0 });
    run(&mut app, 3);

    let recorded = take_recorded(&mut app);
    assert!(!recorded
        .resource
        .iter()
        .any(|e| matches!(e, ResourceEvent::HealthChanged { .. } | ResourceEvent::ActorDeath { .. })));
    // Spend + regen в следующих тиках: stamina растёт от 0.5
    let stamina: Vec<f32> = recorded
        .resource
        .iter()
        .filter_map(|e| match e {
            ResourceEvent::StaminaChanged { percent, .. } => Some(*percent),
            _ => None,
        })
        .collect();
    assert!(stamina.len() >= 2);
    assert!(stamina.windows(2).all(|w| w[1] > w[0]));

    let pool = app.world().get::<ResourcePool>(npc).unwrap();
    assert_eq!(pool.current(Gauge::Health), 100.0);
    assert_eq!(pool.death_state(), DeathState::Alive);
    assert_eq!(pool.percent(Gauge::Stamina), *stamina.last().unwrap());
}
