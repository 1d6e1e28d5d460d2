mod common;

use avian2d::prelude::TranslationExtrapolation;
use bevy::prelude::*;

use arena_prowl::plugins::enemies::Enemy;
use arena_prowl::plugins::player::{Player, PlayerEntity};
use arena_prowl::plugins::projectiles::pool::ProjectilePool;

#[test]
fn boots_and_ticks() {
    let mut app = common::app_headless();

    for _ in 0..3 {
        app.update();
    }
}

#[test]
fn player_spawns_with_extrapolation_and_cached_handle() {
    let mut app = common::app_headless();
    app.update();

    let count = app
        .world_mut()
        .query::<(&Player, &TranslationExtrapolation)>()
        .iter(app.world())
        .count();
    assert_eq!(count, 1);

    let handle = app.world().resource::<PlayerEntity>();
    assert!(handle.0.is_some());
}

#[test]
fn arena_starts_with_three_enemies() {
    let mut app = common::app_headless();
    app.update();

    let count = app
        .world_mut()
        .query::<&Enemy>()
        .iter(app.world())
        .count();
    assert_eq!(count, 3);
}

#[test]
fn projectile_pool_is_primed_idle() {
    let mut app = common::app_headless();
    app.update();

    let pool = app.world().resource::<ProjectilePool>();
    assert_eq!(pool.stats(), (15, 0));
}
