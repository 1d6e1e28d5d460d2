//! Spawn consumer: activate instances from the pool.
//!
//! Activation goes through `Commands` rather than direct component writes:
//! an instance the pool just expanded with exists only as a queued spawn and
//! is not visible to queries yet. Command-based inserts apply to both old
//! and brand-new instances at the next sync point.

use avian2d::prelude::*;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::common::tunables::ProjectileTemplate;

use super::components::{Lifetime, Projectile, ProjectileState};
use super::messages::SpawnProjectileRequest;
use super::pool::{self, ProjectilePool};

pub fn allocate_projectiles(
    mut commands: Commands,
    mut pool: ResMut<ProjectilePool>,
    template: Res<ProjectileTemplate>,
    mut reader: MessageReader<SpawnProjectileRequest>,
) {
    for req in reader.read() {
        let e = match pool.acquire_with(|| pool::spawn_instance(&mut commands, &template)) {
            Ok(e) => e,
            Err(err) => {
                // Capacity or config decision, not a correctness failure.
                warn!("fire request dropped: {err}");
                continue;
            }
        };

        let speed = match req.speed_override {
            Some(s) if s > 0.0 => s,
            Some(s) => {
                warn!("speed override {s} is not positive; using template speed");
                template.speed
            }
            None => template.speed,
        };

        let dir = req.dir.normalize_or(Vec2::Y);

        commands.entity(e).insert((
            ProjectileState::Active,
            Projectile::armed(req.damage),
            Transform::from_translation(req.pos.extend(2.0)),
            LinearVelocity(dir * speed),
            Visibility::Visible,
            pool::active_projectile_layers(),
            Lifetime(Timer::from_seconds(template.life_time, TimerMode::Once)),
        ));
    }
}
