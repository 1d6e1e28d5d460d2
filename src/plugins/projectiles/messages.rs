//! Buffered spawn requests.
//!
//! Producers enqueue intent; the allocator is the single consumer that
//! touches the pool. Nothing else borrows `ResMut<ProjectilePool>` on the
//! spawn path.

use bevy::prelude::*;

#[derive(Message, Clone, Copy, Debug)]
pub struct SpawnProjectileRequest {
    pub pos: Vec2,
    /// Flight direction; normalized by the allocator, so producers may pass
    /// raw aim vectors.
    pub dir: Vec2,
    /// `None` takes the template speed. A non-positive override is rejected
    /// at allocation and also falls back to the template.
    pub speed_override: Option<f32>,
    pub damage: f32,
}
