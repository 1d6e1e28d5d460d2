//! Combat glue tests: the single damage consumer, the death latch, and the
//! kill counter.

#![cfg(test)]

use super::*;

use crate::common::test_utils::run_system_once;

fn combat_world() -> World {
    let mut world = World::new();
    world.init_resource::<Messages<DamageMessage>>();
    world.init_resource::<Messages<HealMessage>>();
    world.init_resource::<Messages<EnemyDied>>();
    world.init_resource::<Score>();
    world.insert_resource(State::new(GameState::InGame));
    world.init_resource::<NextState<GameState>>();
    world
}

fn staged_state(world: &World) -> Option<GameState> {
    match world.resource::<NextState<GameState>>() {
        NextState::Pending(s) => Some(*s),
        NextState::Unchanged => None,
    }
}

#[test]
fn damage_reduces_hp_and_may_go_negative() {
    let mut world = combat_world();
    let e = world.spawn(Health::new(100.0)).id();

    world.write_message(DamageMessage { target: e, amount: 35.0 });
    world.write_message(DamageMessage { target: e, amount: 80.0 });
    run_system_once(&mut world, apply_damage);

    let health = world.get::<Health>(e).unwrap();
    assert_eq!(health.hp, -15.0);
    // Observable boundary clamps.
    assert_eq!(health.observable_hp(), 0.0);
    assert!(health.is_depleted());
}

#[test]
fn dying_enemy_ignores_further_damage() {
    let mut world = combat_world();
    let mut enemy = Enemy::default();
    enemy.state = EnemyState::Dying;
    enemy.next_state = None;
    let e = world.spawn((enemy, Health::new(50.0))).id();

    world.write_message(DamageMessage { target: e, amount: 35.0 });
    run_system_once(&mut world, apply_damage);

    assert_eq!(world.get::<Health>(e).unwrap().hp, 50.0);
}

#[test]
fn dead_player_ignores_damage_and_heals() {
    let mut world = combat_world();
    let e = world.spawn((Player, Dead, Health { hp: 0.0, max_hp: 100.0 })).id();

    world.write_message(DamageMessage { target: e, amount: 10.0 });
    run_system_once(&mut world, apply_damage);
    world.write_message(HealMessage { target: e, amount: 50.0 });
    run_system_once(&mut world, apply_heals);

    assert_eq!(world.get::<Health>(e).unwrap().hp, 0.0);
}

#[test]
fn heal_clamps_at_max_hp() {
    let mut world = combat_world();
    let e = world.spawn(Health { hp: 80.0, max_hp: 100.0 }).id();

    world.write_message(HealMessage { target: e, amount: 50.0 });
    run_system_once(&mut world, apply_heals);

    assert_eq!(world.get::<Health>(e).unwrap().hp, 100.0);
}

#[test]
fn death_latch_fires_once_and_stages_game_over() {
    let mut world = combat_world();
    let e = world.spawn((Player, Health { hp: -5.0, max_hp: 100.0 })).id();

    run_system_once(&mut world, player_death_latch);

    assert!(world.get::<Dead>(e).is_some());
    assert_eq!(staged_state(&world), Some(GameState::GameOver));

    // Already latched: the Without<Dead> filter keeps it from re-firing.
    world.insert_resource(NextState::<GameState>::Unchanged);
    run_system_once(&mut world, player_death_latch);
    assert_eq!(staged_state(&world), None);
}

#[test]
fn kills_accumulate_and_trigger_victory_at_threshold() {
    let mut world = combat_world();
    let e1 = world.spawn_empty().id();
    let e2 = world.spawn_empty().id();
    let e3 = world.spawn_empty().id();

    world.write_message(EnemyDied { entity: e1 });
    world.write_message(EnemyDied { entity: e2 });
    run_system_once(&mut world, track_kills);

    assert_eq!(world.resource::<Score>().kills, 2);
    assert_eq!(staged_state(&world), None);

    world.write_message(EnemyDied { entity: e3 });
    run_system_once(&mut world, track_kills);

    assert_eq!(world.resource::<Score>().kills, 3);
    assert_eq!(staged_state(&world), Some(GameState::Victory));
}
