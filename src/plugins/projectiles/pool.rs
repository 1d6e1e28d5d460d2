//! Pool bookkeeping and the pooled-instance blueprint.
//!
//! The pool never despawns anything. Inactive instances stay in the world,
//! hidden and with empty collision filters, so activation and return are
//! plain component-value writes with no archetype churn.

use std::collections::VecDeque;

use avian2d::prelude::*;
use bevy::platform::collections::HashSet;
use bevy::prelude::*;
use thiserror::Error;

use super::components::{Lifetime, PooledProjectile, Projectile, ProjectileState};
use crate::common::layers::Layer;
use crate::common::tunables::ProjectileTemplate;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolError {
    /// Nothing available and expansion is off or the cap is reached.
    #[error("projectile pool exhausted")]
    Exhausted,
    #[error("projectile template rejected: {0}")]
    MisconfiguredTemplate(&'static str),
}

#[derive(Resource, Debug)]
pub struct ProjectilePool {
    /// FIFO of idle instances; oldest-returned is reused first.
    available: VecDeque<Entity>,
    /// Instances currently in flight. Membership here is what makes a
    /// release legal.
    active: HashSet<Entity>,
    pub initial_size: usize,
    pub max_size: usize,
    pub auto_expand: bool,
}

impl ProjectilePool {
    pub fn new(initial_size: usize, max_size: usize, auto_expand: bool) -> Self {
        Self {
            available: VecDeque::with_capacity(max_size),
            active: HashSet::with_capacity(max_size),
            initial_size,
            max_size,
            auto_expand,
        }
    }

    /// Take an instance for activation: oldest idle first, otherwise a fresh
    /// one from `spawn` while under the cap.
    ///
    /// The caller owns activation; the pool only tracks membership.
    pub fn acquire_with(
        &mut self,
        spawn: impl FnOnce() -> Result<Entity, PoolError>,
    ) -> Result<Entity, PoolError> {
        let e = match self.available.pop_front() {
            Some(e) => e,
            None if self.auto_expand && self.total() < self.max_size => spawn()?,
            None => return Err(PoolError::Exhausted),
        };
        self.active.insert(e);
        Ok(e)
    }

    /// Hand an instance back. Only entities the pool currently considers
    /// active are accepted; anything else is a double release (or a stray
    /// entity) and is dropped with a warning.
    pub fn release(&mut self, e: Entity) -> bool {
        if !self.active.remove(&e) {
            warn!("{e:?} released but not active; ignored");
            return false;
        }
        self.available.push_back(e);
        true
    }

    pub fn is_active(&self, e: Entity) -> bool {
        self.active.contains(&e)
    }

    pub fn total(&self) -> usize {
        self.available.len() + self.active.len()
    }

    /// (available, active)
    pub fn stats(&self) -> (usize, usize) {
        (self.available.len(), self.active.len())
    }

    pub(super) fn push_available(&mut self, e: Entity) {
        self.available.push_back(e);
    }
}

#[inline]
pub fn active_projectile_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::PlayerProjectile, [Layer::World, Layer::Enemy])
}

/// "Disabled" without structural changes: empty filters means the instance
/// collides with nothing and generates no collision events.
#[inline]
pub fn inactive_projectile_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::PlayerProjectile, [] as [Layer; 0])
}

/// Reject templates that would produce degenerate instances.
pub fn validate_template(template: &ProjectileTemplate) -> Result<(), PoolError> {
    if template.collider_radius <= 0.0 {
        return Err(PoolError::MisconfiguredTemplate("collider radius must be positive"));
    }
    if template.speed <= 0.0 {
        return Err(PoolError::MisconfiguredTemplate("speed must be positive"));
    }
    if template.life_time <= 0.0 {
        return Err(PoolError::MisconfiguredTemplate("life time must be positive"));
    }
    Ok(())
}

/// Spawn one pooled instance in its inactive configuration.
///
/// Every field an activation or a return touches is present from birth, so
/// both transitions stay value-only.
pub fn spawn_instance(
    commands: &mut Commands,
    template: &ProjectileTemplate,
) -> Result<Entity, PoolError> {
    validate_template(template)?;

    let e = commands
        .spawn((
            Name::new("Projectile(Pooled)"),
            PooledProjectile,
            ProjectileState::Inactive,
            Projectile::armed(template.damage),
            Sprite {
                color: Color::srgb(1.0, 0.85, 0.3),
                custom_size: Some(Vec2::splat(template.collider_radius * 2.0)),
                ..default()
            },
            Transform::from_xyz(0.0, 0.0, 2.0),
            Visibility::Hidden,
            RigidBody::Dynamic,
            Collider::circle(template.collider_radius),
            inactive_projectile_layers(),
            Friction::ZERO,
            LinearVelocity(Vec2::ZERO),
            AngularVelocity(0.0),
            // Kept on permanently; inactive instances never collide anyway
            // because their filters are empty.
            CollisionEventsEnabled,
            Lifetime(Timer::from_seconds(template.life_time, TimerMode::Once)),
        ))
        .id();

    Ok(e)
}

/// Startup: prime the pool with `initial_size` idle instances.
///
/// A rejected template leaves the pool empty rather than aborting the app;
/// every later acquire then fails with the same error.
pub fn init_projectile_pool(
    mut commands: Commands,
    mut pool: ResMut<ProjectilePool>,
    template: Res<ProjectileTemplate>,
) {
    let n = pool.initial_size;
    let mut ok = 0;

    for _ in 0..n {
        match spawn_instance(&mut commands, &template) {
            Ok(e) => {
                pool.push_available(e);
                ok += 1;
            }
            Err(err) => {
                error!("projectile pool priming stopped: {err}");
                break;
            }
        }
    }

    info!("projectile pool primed {ok}/{n}");
}
