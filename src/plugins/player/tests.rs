use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::test_utils::run_system_once;
use crate::common::tunables::Tunables;
use crate::plugins::combat::Dead;

#[test]
fn spawn_creates_player_and_caches_handle() {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    run_system_once(&mut world, super::spawn);

    let e = world.query::<(Entity, &super::Player)>().iter(&world).next();
    assert!(e.is_some());
    let handle = world.resource::<super::PlayerEntity>();
    assert_eq!(handle.0, e.map(|(e, _)| e));
}

#[test]
fn apply_movement_sets_velocity() {
    let mut world = World::new();
    world.insert_resource(Tunables { player_speed: 100.0, ..default() });
    world.insert_resource(super::PlayerInput { move_axis: Vec2::new(1.0, 0.0) });
    world.spawn((super::Player, LinearVelocity::ZERO));

    run_system_once(&mut world, super::apply_movement);

    let v = world.query::<&LinearVelocity>().iter(&world).next().unwrap();
    assert_eq!(v.0, Vec2::new(100.0, 0.0));
}

#[test]
fn dead_player_does_not_move() {
    let mut world = World::new();
    world.insert_resource(Tunables { player_speed: 100.0, ..default() });
    world.insert_resource(super::PlayerInput { move_axis: Vec2::new(0.0, 1.0) });
    world.spawn((super::Player, Dead, LinearVelocity(Vec2::new(5.0, 5.0))));

    run_system_once(&mut world, super::apply_movement);

    let v = world.query::<&LinearVelocity>().iter(&world).next().unwrap();
    assert_eq!(v.0, Vec2::ZERO);
}
