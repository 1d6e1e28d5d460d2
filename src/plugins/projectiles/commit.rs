//! Return commit: recycle instances back into the pool.
//!
//! This system owns the inactive invariants. An inactive instance must be:
//! - hidden,
//! - velocity zero (linear and angular),
//! - parked at the origin,
//! - colliding with nothing (filters empty),
//! - `has_hit` cleared, lifetime reset.
//!
//! Centralizing these writes here keeps the two halves of the pool contract
//! from drifting apart.

use avian2d::prelude::*;
use bevy::prelude::*;

use super::components::{Lifetime, PooledProjectile, Projectile, ProjectileState};
use super::pool::{inactive_projectile_layers, ProjectilePool};

pub fn return_to_pool_commit(
    mut pool: ResMut<ProjectilePool>,
    mut q: Query<
        (
            Entity,
            &mut ProjectileState,
            &mut Projectile,
            &mut Visibility,
            &mut Transform,
            &mut LinearVelocity,
            &mut AngularVelocity,
            &mut CollisionLayers,
            &mut Lifetime,
        ),
        With<PooledProjectile>,
    >,
) {
    for (e, mut state, mut projectile, mut vis, mut tf, mut vel, mut ang, mut layers, mut lifetime) in
        &mut q
    {
        if *state != ProjectileState::PendingReturn {
            continue;
        }

        *state = ProjectileState::Inactive;
        projectile.has_hit = false;
        *vis = Visibility::Hidden;
        tf.translation = Vec3::new(0.0, 0.0, 2.0);
        tf.rotation = Quat::IDENTITY;
        vel.0 = Vec2::ZERO;
        ang.0 = 0.0;
        *layers = inactive_projectile_layers();
        lifetime.reset();

        // Double releases are guarded inside the pool.
        pool.release(e);
    }
}
