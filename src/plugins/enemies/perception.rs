//! Perception: sight and melee-proximity checks.
//!
//! Sight is recomputed fresh every tick, cheapest check first:
//! distance, then field-of-view angle, then (only if both passed) a
//! line-of-sight ray. The ray must reach the player unobstructed to count;
//! floor tiles have no colliders and never block it.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::layers::Layer;
use crate::common::tunables::EnemyTunables;
use crate::plugins::player;

pub fn player_in_sight(
    spatial: &SpatialQuery,
    me: Entity,
    my_pos: Vec2,
    facing: Vec2,
    player: Entity,
    player_pos: Vec2,
    tunables: &EnemyTunables,
) -> bool {
    let to_player = player_pos - my_pos;
    let distance = to_player.length();

    if distance > tunables.sight_range {
        return false;
    }

    if facing.angle_to(to_player).abs() > tunables.field_of_view * 0.5 {
        return false;
    }

    // Co-located with the player; no meaningful ray direction.
    let Ok(direction) = Dir2::new(to_player) else {
        return true;
    };

    let filter = SpatialQueryFilter::from_mask([Layer::World, Layer::Player, Layer::Enemy])
        .with_excluded_entities([me]);

    match spatial.cast_ray(my_pos, direction, distance, true, &filter) {
        Some(hit) => hit.entity == player,
        // Nothing in the way (the ray can miss the player's own collider when
        // the distance check already put it in reach).
        None => true,
    }
}

/// Proximity test against the target-occupying volume: the player counts as
/// in melee range when the attack radius touches their body circle.
pub fn in_melee_range(my_pos: Vec2, player_pos: Vec2, attack_range: f32) -> bool {
    let reach = attack_range + player::BODY_RADIUS;
    my_pos.distance_squared(player_pos) <= reach * reach
}
