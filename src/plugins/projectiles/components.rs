use bevy::prelude::*;

/// Marker: entity belongs to the projectile pool and never leaves it.
#[derive(Component)]
pub struct PooledProjectile;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectileState {
    #[default]
    Inactive,
    Active,
    PendingReturn,
}

/// Per-shot payload, rewritten on every activation.
#[derive(Component, Debug, Clone)]
pub struct Projectile {
    pub damage: f32,
    /// First-contact latch: once true, further contacts in the same flight
    /// are ignored until the pool recycles the instance.
    pub has_hit: bool,
}

impl Projectile {
    pub fn armed(damage: f32) -> Self {
        Self { damage, has_hit: false }
    }
}

/// Time since activation, counting up to the lifetime cap. Also drives the
/// arming grace window: contacts are ignored while the elapsed time is below
/// it.
#[derive(Component, Debug, Deref, DerefMut)]
pub struct Lifetime(pub Timer);
