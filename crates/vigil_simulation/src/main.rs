//! Headless симуляция VIGIL
//!
//! Два отряда друг напротив друга. Игрушечные perception и decision layer
//! (только для демо): все видят всех в радиусе, бой до смерти.

use bevy::prelude::*;
use vigil_simulation::ai::{DetectionState, DetectionTracker};
use vigil_simulation::combat::{CombatCoordinator, CombatMovementType, CombatState};
use vigil_simulation::vitals::ResourcePool;
use vigil_simulation::{
    create_headless_app, set_log_level, spawn_actor_in_world, ActorArchetype, CombatRequest, Dead,
    LogLevel, PerceptionSnapshot, ResourceCommand, SimulationSet,
};

const SQUAD_SIZE: usize = 4;
const SIGHT_RANGE: f32 = 30.0;
const DAMAGE_PER_SECOND: f32 = 12.0;

/// Позиции в демо статичны
#[derive(Component, Clone, Copy)]
struct DemoPosition(Vec3);

fn main() {
    let seed = 42;
    println!("Starting VIGIL headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    set_log_level(LogLevel::Info);

    app.add_systems(
        FixedUpdate,
        (
            demo_perception.before(SimulationSet::Sensing),
            demo_decisions
                .after(SimulationSet::Sensing)
                .before(SimulationSet::Decision),
        ),
    );

    let archetype = ActorArchetype::named("trooper");
    for (faction, x) in [(1u64, -10.0f32), (2, 10.0)] {
        for i in 0..SQUAD_SIZE {
            let entity = match spawn_actor_in_world(app.world_mut(), &archetype, faction) {
                Ok(entity) => entity,
                Err(err) => {
                    eprintln!("Invalid archetype: {}", err);
                    return;
                }
            };
            app.world_mut()
                .entity_mut(entity)
                .insert(DemoPosition(Vec3::new(x, 0.0, i as f32 * 3.0)));
        }
    }

    // Запускаем 3000 тиков симуляции (~50 секунд)
    for tick in 0..3000 {
        app.update();

        if tick % 300 == 0 {
            let world = app.world_mut();
            let alive = world
                .query_filtered::<&ResourcePool, Without<Dead>>()
                .iter(world)
                .filter(|pool| pool.is_alive())
                .count();
            println!("Tick {}: {} actors alive", tick, alive);
        }
    }

    println!("Simulation complete!");
}

/// Perception collaborator: все живые (не Dying) в радиусе видимы
fn demo_perception(
    actors: Query<(Entity, &DemoPosition, &ResourcePool), Without<Dead>>,
    mut snapshot: ResMut<PerceptionSnapshot>,
) {
    snapshot.clear();
    let all: Vec<(Entity, Vec3)> = actors
        .iter()
        .filter(|(_, _, pool)| pool.is_alive())
        .map(|(e, p, _)| (e, p.0))
        .collect();

    for &(observer, position) in &all {
        snapshot.set_position(observer, position);
        let nearby: Vec<Entity> = all
            .iter()
            .filter(|(other, other_pos)| {
                *other != observer && position.distance(*other_pos) <= SIGHT_RANGE
            })
            .map(|(other, _)| *other)
            .collect();
        for &other in &nearby {
            snapshot.set_visible(observer, other, true);
        }
        snapshot.set_nearby(observer, nearby);
    }
}

/// Decision layer: видим цель → бой, давим; бьём текущую цель
fn demo_decisions(
    actors: Query<(Entity, &DetectionTracker, &CombatCoordinator)>,
    mut requests: EventWriter<CombatRequest>,
    mut resource_commands: EventWriter<ResourceCommand>,
    time: Res<Time<Fixed>>,
) {
    for (actor, detection, combat) in actors.iter() {
        match (detection.state(), combat.state()) {
            (DetectionState::Active, CombatState::Inactive) => {
                requests.write(CombatRequest::SetState {
                    actor,
                    state: CombatState::Active,
                });
            }
            (DetectionState::Lost, CombatState::Active | CombatState::Searching) => {
                requests.write(CombatRequest::SetState {
                    actor,
                    state: CombatState::Inactive,
                });
            }
            _ => {}
        }

        if combat.is_in_combat() && combat.is_movement_expired() {
            requests.write(CombatRequest::SelectMovement {
                actor,
                movement: CombatMovementType::PressAttack,
            });
        }

        if combat.should_attack() && detection.state() == DetectionState::Active {
            if let Some(target) = detection.target() {
                resource_commands.write(ResourceCommand::DamageHealth {
                    actor: target,
                    amount: DAMAGE_PER_SECOND * time.delta_secs(),
                });
            }
        }
    }
}
