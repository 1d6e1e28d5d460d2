//! Resolve contact events into damage and pending returns.
//!
//! Collision events arrive on collider entities; the gameplay target (the
//! entity carrying `Health`) may be the rigid body above them. Damage is not
//! applied here: this system only emits `DamageMessage`s, and the single
//! combat consumer applies them with its terminal-state gating.

use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;

use crate::common::layers::Layer;
use crate::common::tunables::ProjectileTemplate;
use crate::plugins::combat::DamageMessage;

use super::components::{Lifetime, PooledProjectile, Projectile, ProjectileState};

#[derive(Clone, Copy, Debug)]
struct CollisionTarget {
    collider: Entity,
    body: Option<Entity>,
}

impl CollisionTarget {
    #[inline]
    fn gameplay_owner(self) -> Entity {
        self.body.unwrap_or(self.collider)
    }
}

#[inline]
fn targets(ev: &CollisionStart) -> (CollisionTarget, CollisionTarget) {
    (
        CollisionTarget { collider: ev.collider1, body: ev.body1 },
        CollisionTarget { collider: ev.collider2, body: ev.body2 },
    )
}

#[inline]
fn is_in_layer(layers: &CollisionLayers, layer: Layer) -> bool {
    layers.memberships.has_all(layer)
}

pub fn process_projectile_collisions(
    mut started: MessageReader<CollisionStart>,
    template: Res<ProjectileTemplate>,
    // Fast "is this a pooled projectile?" check
    q_is_projectile: Query<(), With<PooledProjectile>>,
    mut q_projectiles: Query<
        (&mut Projectile, &mut ProjectileState, &Lifetime),
        With<PooledProjectile>,
    >,
    q_layers: Query<&CollisionLayers>,
    mut damage: MessageWriter<DamageMessage>,
    // Per-run dedupe of multi-contact starts
    mut seen: Local<HashSet<Entity>>,
) {
    seen.clear();

    for ev in started.read() {
        let (t1, t2) = targets(ev);

        // Exactly one side must be a projectile; projectile-projectile pairs
        // are filtered out by layers, but stay defensive about ordering.
        let p1 = q_is_projectile.contains(t1.collider);
        let p2 = q_is_projectile.contains(t2.collider);
        if !(p1 ^ p2) {
            continue;
        }
        let (projectile_side, other_side) = if p1 { (t1, t2) } else { (t2, t1) };

        if !seen.insert(projectile_side.collider) {
            continue;
        }

        let Ok((mut projectile, mut state, lifetime)) =
            q_projectiles.get_mut(projectile_side.collider)
        else {
            continue;
        };

        if *state != ProjectileState::Active {
            continue;
        }

        // Arming grace: contacts in the first instants of flight are from
        // overlapping the firer and do not count at all.
        if lifetime.elapsed_secs() < template.grace_window {
            continue;
        }

        if projectile.has_hit {
            continue;
        }
        projectile.has_hit = true;

        if let Ok(other_layers) = q_layers.get(other_side.collider)
            && is_in_layer(other_layers, Layer::Enemy)
        {
            damage.write(DamageMessage {
                target: other_side.gameplay_owner(),
                amount: projectile.damage,
            });
        }

        // Walls and enemies alike consume the shot.
        *state = ProjectileState::PendingReturn;
    }
}
