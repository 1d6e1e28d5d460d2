//! Collision layers.
//!
//! Floor tiles carry no colliders, so only wall/pillar geometry (World) can
//! occlude sight or stop movement.

use avian2d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    #[default]
    Default,
    World,
    Player,
    Enemy,
    PlayerProjectile,
}
