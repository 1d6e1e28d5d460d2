//! Asset-free animation collaborator.
//!
//! Plays fixed-length "clips" with timers and reports back through
//! `AnimSignal` messages: an impact signal at the mid-clip frame and a done
//! signal at the end, matching how animation events would fire on a real rig.
//! Visuals are plain sprite tint/scale so the project stays asset-free.

use bevy::prelude::*;
use bevy::time::Fixed;

use super::messages::{AnimCommand, AnimCommandKind, AnimSignal, AnimSignalKind};
use super::Enemy;

pub const ATTACK_CLIP_SECS: f32 = 0.9;
pub const KICK_CLIP_SECS: f32 = 1.1;
pub const DYING_CLIP_SECS: f32 = 3.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClipKind {
    Attack,
    Kick,
    Dying,
}

impl ClipKind {
    fn duration(self) -> f32 {
        match self {
            ClipKind::Attack => ATTACK_CLIP_SECS,
            ClipKind::Kick => KICK_CLIP_SECS,
            ClipKind::Dying => DYING_CLIP_SECS,
        }
    }
}

#[derive(Debug)]
struct ActiveClip {
    kind: ClipKind,
    timer: Timer,
    impact_sent: bool,
}

impl ActiveClip {
    fn start(kind: ClipKind) -> Self {
        Self {
            kind,
            timer: Timer::from_seconds(kind.duration(), TimerMode::Once),
            impact_sent: false,
        }
    }
}

#[derive(Component, Debug, Default)]
pub struct AnimPlayer {
    pub moving: bool,
    clip: Option<ActiveClip>,
}

impl AnimPlayer {
    pub fn clip_kind(&self) -> Option<ClipKind> {
        self.clip.as_ref().map(|c| c.kind)
    }
}

/// Consume FSM commands, advance the active clip, emit signals.
pub fn drive_clips(
    time: Res<Time<Fixed>>,
    mut commands: MessageReader<AnimCommand>,
    mut signals: MessageWriter<AnimSignal>,
    mut q: Query<(Entity, &mut AnimPlayer, &mut Sprite, &mut Transform), With<Enemy>>,
) {
    for cmd in commands.read() {
        let Ok((_, mut player, _, _)) = q.get_mut(cmd.entity) else {
            debug!("anim command for {:?} without an AnimPlayer; dropped", cmd.entity);
            continue;
        };

        match cmd.kind {
            AnimCommandKind::SetMoving(moving) => player.moving = moving,
            AnimCommandKind::TriggerAttack => player.clip = Some(ActiveClip::start(ClipKind::Attack)),
            AnimCommandKind::TriggerKick => player.clip = Some(ActiveClip::start(ClipKind::Kick)),
            AnimCommandKind::TriggerDying => player.clip = Some(ActiveClip::start(ClipKind::Dying)),
        }
    }

    for (entity, mut player, mut sprite, mut tf) in &mut q {
        let Some(clip) = player.clip.as_mut() else {
            continue;
        };

        clip.timer.tick(time.delta());

        let dur = clip.timer.duration().as_secs_f32().max(0.0001);
        let t = (clip.timer.elapsed_secs() / dur).clamp(0.0, 1.0);

        if !clip.impact_sent && t >= 0.5 {
            clip.impact_sent = true;
            match clip.kind {
                ClipKind::Attack => {
                    signals.write(AnimSignal { entity, kind: AnimSignalKind::AttackImpact });
                }
                ClipKind::Kick => {
                    signals.write(AnimSignal { entity, kind: AnimSignalKind::KickImpact });
                }
                ClipKind::Dying => {}
            }
        }

        match clip.kind {
            // Wind-up flash: brighten toward the impact frame, settle after.
            ClipKind::Attack | ClipKind::Kick => {
                let flash = 1.0 - (t - 0.5).abs() * 2.0;
                let mut c = Color::srgb(0.9, 0.25, 0.25).to_srgba();
                c.red = (c.red + flash * 0.4).min(1.0);
                c.green = (c.green + flash * 0.2).min(1.0);
                sprite.color = c.into();
            }
            // Shrink-and-fade, the same curve the despawn delay covers.
            ClipKind::Dying => {
                tf.scale = Vec3::splat(1.0 - t);
                let mut c = sprite.color.to_srgba();
                c.alpha = 1.0 - t;
                sprite.color = c.into();
            }
        }

        if clip.timer.is_finished() {
            let done = match clip.kind {
                ClipKind::Attack => Some(AnimSignalKind::AttackDone),
                ClipKind::Kick => Some(AnimSignalKind::KickDone),
                ClipKind::Dying => None,
            };
            player.clip = None;

            if let Some(kind) = done {
                signals.write(AnimSignal { entity, kind });
            }
        }
    }
}
