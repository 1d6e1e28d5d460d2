//! Tunable gameplay constants.
//!
//! Distances are in world pixels; metre-scale values map through
//! `pixels_per_meter`.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    pub pixels_per_meter: f32,
    pub player_speed: f32,
    pub player_max_hp: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self { pixels_per_meter: 20.0, player_speed: 420.0, player_max_hp: 100.0 }
    }
}

/// Per-enemy perception and combat parameters.
///
/// A component rather than a global resource so individual enemies can be
/// tuned (or weakened) without touching the rest.
#[derive(Component, Debug, Clone)]
pub struct EnemyTunables {
    /// Radius within which a close-combat action may start.
    pub attack_range: f32,
    pub sight_range: f32,
    /// Full cone angle, radians. Perception checks against half of it.
    pub field_of_view: f32,
    pub patrol_range: f32,
    pub patrol_wait_time: f32,
    pub max_hp: f32,
    /// Chance of picking the kick over the regular attack, `0.0..=1.0`.
    pub kick_probability: f32,
    /// Safety net: force an attack state to end even if the animation
    /// collaborator never reports completion.
    pub attack_timeout: f32,
    pub attack_damage: f32,
    pub kick_damage: f32,
    pub move_speed: f32,
}

impl Default for EnemyTunables {
    fn default() -> Self {
        Self {
            attack_range: 60.0,
            sight_range: 200.0,
            field_of_view: 120f32.to_radians(),
            patrol_range: 400.0,
            patrol_wait_time: 1.5,
            max_hp: 100.0,
            kick_probability: 0.3,
            attack_timeout: 3.0,
            attack_damage: 15.0,
            kick_damage: 25.0,
            move_speed: 160.0,
        }
    }
}

/// Blueprint for pooled projectile instances.
#[derive(Resource, Debug, Clone)]
pub struct ProjectileTemplate {
    pub collider_radius: f32,
    pub speed: f32,
    pub life_time: f32,
    /// Post-spawn window during which contacts are ignored, so a projectile
    /// cannot immediately collide with its firer.
    pub grace_window: f32,
    pub damage: f32,
}

impl Default for ProjectileTemplate {
    fn default() -> Self {
        Self {
            collider_radius: 4.0,
            speed: 600.0,
            life_time: 5.0,
            grace_window: 0.1,
            damage: 35.0,
        }
    }
}
