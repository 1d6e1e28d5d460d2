//! Fire → fly → hit → recycle, through the real schedules.
//!
//! The input/camera producer is bypassed: requests are written directly, the
//! way any producer system would. Contacts are injected as `CollisionStart`
//! messages so the test does not depend on solver timing.

mod common;

use std::time::Duration;

use avian2d::prelude::*;
use bevy::prelude::*;

use arena_prowl::plugins::combat::Health;
use arena_prowl::plugins::enemies::Enemy;
use arena_prowl::plugins::projectiles::components::{PooledProjectile, ProjectileState};
use arena_prowl::plugins::projectiles::messages::SpawnProjectileRequest;
use arena_prowl::plugins::projectiles::pool::ProjectilePool;

fn fixed_tick(app: &mut App, dt: f32) {
    app.world_mut()
        .resource_mut::<Time<Fixed>>()
        .advance_by(Duration::from_secs_f32(dt));
    app.world_mut().run_schedule(FixedUpdate);
    app.world_mut().run_schedule(FixedPostUpdate);
}

fn active_projectile(app: &mut App) -> Entity {
    let mut q = app
        .world_mut()
        .query_filtered::<Entity, With<PooledProjectile>>();
    let pool = app.world().resource::<ProjectilePool>();
    q.iter(app.world())
        .find(|e| pool.is_active(*e))
        .expect("one projectile in flight")
}

#[test]
fn full_flight_damages_enemy_and_recycles() {
    let mut app = common::app_headless();
    app.update();

    app.world_mut().write_message(SpawnProjectileRequest {
        pos: Vec2::new(0.0, -150.0),
        dir: Vec2::Y,
        speed_override: None,
        damage: 35.0,
    });
    app.update();

    assert_eq!(app.world().resource::<ProjectilePool>().stats(), (14, 1));
    let projectile = active_projectile(&mut app);
    assert_eq!(
        *app.world().get::<ProjectileState>(projectile).unwrap(),
        ProjectileState::Active
    );

    // Fly past the arming grace window.
    fixed_tick(&mut app, 0.2);

    let enemy = {
        let mut q = app.world_mut().query_filtered::<Entity, With<Enemy>>();
        q.iter(app.world()).next().unwrap()
    };
    let hp_before = app.world().get::<Health>(enemy).unwrap().hp;

    app.world_mut().write_message(CollisionStart {
        collider1: projectile,
        collider2: enemy,
        body1: Some(projectile),
        body2: Some(enemy),
    });
    fixed_tick(&mut app, 1.0 / 60.0);

    // Damage applied through the combat consumer, shot consumed and recycled.
    assert_eq!(
        app.world().get::<Health>(enemy).unwrap().hp,
        hp_before - 35.0
    );
    assert_eq!(app.world().resource::<ProjectilePool>().stats(), (15, 0));
    assert_eq!(
        *app.world().get::<ProjectileState>(projectile).unwrap(),
        ProjectileState::Inactive
    );

    // A stale contact for the recycled instance must not double-dip.
    app.world_mut().write_message(CollisionStart {
        collider1: projectile,
        collider2: enemy,
        body1: Some(projectile),
        body2: Some(enemy),
    });
    fixed_tick(&mut app, 1.0 / 60.0);

    assert_eq!(
        app.world().get::<Health>(enemy).unwrap().hp,
        hp_before - 35.0
    );
    assert_eq!(app.world().resource::<ProjectilePool>().stats(), (15, 0));
}

#[test]
fn pool_expands_beyond_the_primed_size() {
    let mut app = common::app_headless();
    app.update();

    for _ in 0..20 {
        app.world_mut().write_message(SpawnProjectileRequest {
            pos: Vec2::ZERO,
            dir: Vec2::X,
            speed_override: None,
            damage: 35.0,
        });
    }
    app.update();

    // 15 primed + 5 expanded, capped well under max_size 30.
    let (available, active) = app.world().resource::<ProjectilePool>().stats();
    assert_eq!(available, 0);
    assert_eq!(active, 20);
}
