use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::common::tunables::ProjectileTemplate;
use crate::plugins::camera::MainCamera;
use crate::plugins::combat::Dead;
use crate::plugins::player::Player;

use super::messages::SpawnProjectileRequest;

const MUZZLE_OFFSET: f32 = 18.0;

/// Producer: fire toward the cursor on left click.
///
/// Does not touch the pool; only enqueues intent.
pub fn request_player_fire(
    buttons: Option<Res<ButtonInput<MouseButton>>>,
    windows: Query<&Window>,
    q_camera: Query<(&Camera, &GlobalTransform), With<MainCamera>>,
    q_player: Query<&Transform, (With<Player>, Without<Dead>)>,
    template: Res<ProjectileTemplate>,
    mut writer: MessageWriter<SpawnProjectileRequest>,
) {
    let Some(buttons) = buttons else { return };
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }

    // A dead player fails the query; no shots from beyond the grave.
    let Ok(player_tf) = q_player.single() else {
        return;
    };
    let origin = player_tf.translation.truncate();

    let Ok(window) = windows.single() else {
        debug!("no single Window; fire request dropped");
        return;
    };
    let Some(cursor) = window.cursor_position() else {
        return;
    };

    let Ok((camera, camera_tf)) = q_camera.single() else {
        debug!("no single MainCamera; fire request dropped");
        return;
    };
    let Ok(world_cursor) = camera.viewport_to_world_2d(camera_tf, cursor) else {
        return;
    };

    let dir = (world_cursor - origin).normalize_or(Vec2::Y);

    writer.write(SpawnProjectileRequest {
        pos: origin + dir * MUZZLE_OFFSET,
        dir,
        speed_override: None,
        damage: template.damage,
    });
}
