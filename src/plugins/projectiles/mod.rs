//! Projectiles plugin: message-based producer → consumer spawning on top of a
//! fixed-size, auto-expanding pool.
//!
//! # Data flow
//! ```text
//!   Update schedule (variable dt)
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  (A) Producer: request_player_fire                                   │
//! │      - reads: MouseButton input, cursor, MainCamera, Player          │
//! │      - writes: SpawnProjectileRequest message                        │
//! │                                                                      │
//! │  (B) Consumer: allocate_projectiles                                  │
//! │      - reads: SpawnProjectileRequest messages                        │
//! │      - mutates: ProjectilePool (FIFO pop / expand up to the cap)     │
//! │      - inserts: Active state, armed Projectile, Transform, velocity, │
//! │                 visibility, live collision layers, fresh Lifetime    │
//! └──────────────────────────────────────────────────────────────────────┘
//!                 │
//!                 v
//!   FixedUpdate / FixedPostUpdate (fixed dt)
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │  (C) tick_lifetimes: expire misses → PendingReturn                   │
//! │                                                                      │
//! │  (D) Physics emits CollisionStart messages (Avian)                   │
//! │                                                                      │
//! │  (E) process_projectile_collisions                                   │
//! │      - grace window + first-contact latch                            │
//! │      - enemy contact → DamageMessage                                 │
//! │      - any qualifying contact → PendingReturn                        │
//! │                                                                      │
//! │  (F) return_to_pool_commit: restore inactive invariants,             │
//! │      push back into the pool FIFO                                    │
//! └──────────────────────────────────────────────────────────────────────┘
//!
//! Feedback loop:
//!   commit releases entities into ProjectilePool.available
//!   allocator acquires them again, oldest first
//! ```
//!
//! The pool never despawns: activation and return toggle collision filters
//! and component values only, so flight-rate churn causes no archetype moves.

pub mod components;
pub mod pool;

pub mod allocator;
pub mod collision;
pub mod commit;
pub mod lifetime;
pub mod messages;
pub mod request;

use avian2d::collision::narrow_phase::CollisionEventSystems;
use bevy::ecs::message::Messages;
use bevy::prelude::*;

use crate::common::state::GameState;

pub struct ProjectilesPlugin;

/// Messages are double-buffered; `update()` advances buffers.
fn update_spawn_messages(mut msgs: ResMut<Messages<messages::SpawnProjectileRequest>>) {
    msgs.update();
}

impl Plugin for ProjectilesPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(pool::ProjectilePool::new(15, 30, true))
            .add_systems(Startup, pool::init_projectile_pool);

        app.init_resource::<Messages<messages::SpawnProjectileRequest>>();
        app.add_systems(PostUpdate, update_spawn_messages);

        // Update-phase pipeline: request -> allocate
        app.add_systems(
            Update,
            (
                request::request_player_fire,
                allocator::allocate_projectiles.after(request::request_player_fire),
            )
                .run_if(in_state(GameState::InGame)),
        );

        app.add_systems(
            FixedUpdate,
            lifetime::tick_lifetimes.run_if(in_state(GameState::InGame)),
        );

        // Fixed collision pipeline
        app.add_systems(
            FixedPostUpdate,
            collision::process_projectile_collisions
                .after(CollisionEventSystems)
                .run_if(in_state(GameState::InGame)),
        )
        .add_systems(
            FixedPostUpdate,
            commit::return_to_pool_commit
                .after(collision::process_projectile_collisions)
                .run_if(in_state(GameState::InGame)),
        );
    }
}
