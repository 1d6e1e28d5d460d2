//! Player plugin.
//!
//! Pipeline:
//! - Update: sample input, write PlayerInput resource
//! - FixedUpdate: apply velocity to kinematic rigid body
//!
//! Death is a one-way latch: once `Dead` is inserted, input gathering and
//! movement application stop touching this entity, and the fire producer
//! (projectiles::request) refuses to emit requests.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{layers::Layer, state::GameState, tunables::Tunables};
use crate::plugins::combat::{Dead, Health};

pub const BODY_RADIUS: f32 = 13.0;

#[derive(Component)]
pub struct Player;

/// Cached player entity handle, set on spawn.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct PlayerEntity(pub Option<Entity>);

#[derive(Resource, Default, Debug)]
pub struct PlayerInput {
    pub move_axis: Vec2,
}

pub fn plugin(app: &mut App) {
    app.insert_resource(PlayerInput::default())
        .init_resource::<PlayerEntity>()
        .add_systems(OnEnter(GameState::InGame), spawn)
        .add_systems(Update, gather_input.run_if(in_state(GameState::InGame)))
        .add_systems(FixedUpdate, apply_movement.run_if(in_state(GameState::InGame)));
}

fn spawn(mut commands: Commands, tunables: Res<Tunables>) {
    let layers = CollisionLayers::new(Layer::Player, [Layer::World, Layer::Enemy]);

    let e = commands
        .spawn((
            Name::new("Player"),
            Player,
            Health::new(tunables.player_max_hp),
            Sprite {
                color: Color::srgb(0.2, 0.75, 0.9),
                custom_size: Some(Vec2::splat(26.0)),
                ..default()
            },
            Transform::from_xyz(0.0, -200.0, 1.0),
            RigidBody::Kinematic,
            Collider::circle(BODY_RADIUS),
            layers,
            LinearVelocity::ZERO,
            TranslationExtrapolation,
            DespawnOnExit(GameState::InGame),
        ))
        .id();

    commands.insert_resource(PlayerEntity(Some(e)));
}

fn gather_input(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut input: ResMut<PlayerInput>,
    q_dead: Query<(), (With<Player>, With<Dead>)>,
) {
    if !q_dead.is_empty() {
        input.move_axis = Vec2::ZERO;
        return;
    }

    let Some(keys) = keys else { return };

    let mut axis = Vec2::ZERO;

    if keys.pressed(KeyCode::KeyW) {
        axis.y += 1.0;
    }
    if keys.pressed(KeyCode::KeyS) {
        axis.y -= 1.0;
    }
    if keys.pressed(KeyCode::KeyA) {
        axis.x -= 1.0;
    }
    if keys.pressed(KeyCode::KeyD) {
        axis.x += 1.0;
    }

    input.move_axis = if axis.length_squared() > 0.0 {
        axis.normalize()
    } else {
        Vec2::ZERO
    };
}

fn apply_movement(
    tunables: Res<Tunables>,
    input: Res<PlayerInput>,
    mut q_player: Query<(&mut LinearVelocity, Has<Dead>), With<Player>>,
) {
    let Ok((mut vel, dead)) = q_player.single_mut() else {
        return;
    };
    vel.0 = if dead {
        Vec2::ZERO
    } else {
        input.move_axis * tunables.player_speed
    };
}

#[cfg(test)]
mod tests;
