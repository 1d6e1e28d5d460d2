use bevy::prelude::*;
use bevy::time::Fixed;

use super::components::{Lifetime, PooledProjectile, ProjectileState};

/// Expire long-lived misses. Only active instances count time; idle ones sit
/// with a finished timer until activation resets it.
pub fn tick_lifetimes(
    time: Res<Time<Fixed>>,
    mut q: Query<(&mut Lifetime, &mut ProjectileState), With<PooledProjectile>>,
) {
    for (mut lifetime, mut state) in &mut q {
        if *state != ProjectileState::Active {
            continue;
        }

        lifetime.tick(time.delta());
        if lifetime.is_finished() {
            *state = ProjectileState::PendingReturn;
        }
    }
}
