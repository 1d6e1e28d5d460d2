//! Enemy AI: a small explicit finite-state machine.
//!
//! -----------------------------
//! HOW THIS IS DESIGNED (ECS)
//! -----------------------------
//! The machine lives in one component (`Enemy`) and is advanced by one
//! fixed-tick system (`enemy_fsm_tick`) in a strict order:
//!
//! 1. terminal check (Dying freezes the entity),
//! 2. global death check (HP <= 0 stages Dying over anything else),
//! 3. state-time accumulation,
//! 4. fresh perception (distance -> FOV -> line-of-sight ray),
//! 5. decision table (only when no transition is already staged),
//! 6. transition application + one-time entry actions,
//! 7. chase steering (destination refresh + smoothed facing).
//!
//! Transitions are staged in `next_state` and applied at the end of the same
//! tick, so entry actions run exactly once per transition.
//!
//! Attack states end on an `AnimSignal` done message OR an `attack_timeout`
//! elapsed check, whichever comes first. The timeout arm means a broken
//! animation wiring can never deadlock the machine; it logs a warning so the
//! wiring defect is still visible.
//!
//! Structural changes stay centralized: the FSM only marks, a PostUpdate
//! system despawns.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy::time::Fixed;
use bevy_firefly::prelude::Occluder2d;

use crate::common::layers::Layer;
use crate::common::rng::GameRng;
use crate::common::state::GameState;
use crate::common::tunables::EnemyTunables;
use crate::plugins::combat::{DamageMessage, EnemyDied, Health};
use crate::plugins::player::{Player, PlayerEntity};

pub mod anim;
pub mod messages;
pub mod nav;
pub mod perception;

use bevy::ecs::message::Messages;

use self::anim::AnimPlayer;
use self::messages::{AnimCommand, AnimCommandKind, AnimSignal, AnimSignalKind};
use self::nav::NavAgent;

/// Seconds between entering Dying and leaving the simulation.
pub const DESPAWN_DELAY: f32 = 3.0;

/// Exponential turn-rate factor used while chasing (fraction of the remaining
/// angle closed per second).
const TURN_RATE: f32 = 5.0;

const BODY_RADIUS: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyState {
    /// Transient bootstrap value; never re-entered after the first tick.
    None,
    Idle,
    Patrol,
    Chase,
    Attack,
    /// Kick attack, picked over the regular attack with `kick_probability`.
    Martelo,
    /// Terminal. State and HP never change again.
    Dying,
}

#[derive(Component, Debug)]
pub struct Enemy {
    pub state: EnemyState,
    /// Staged transition, applied (and cleared) at the end of the tick.
    pub next_state: Option<EnemyState>,
    /// Seconds since entering the current state.
    pub state_time: f32,
    pub attack_done: bool,
    pub kick_done: bool,
}

impl Default for Enemy {
    fn default() -> Self {
        Self {
            state: EnemyState::None,
            // First tick transitions into Patrol.
            next_state: Some(EnemyState::Patrol),
            state_time: 0.0,
            attack_done: false,
            kick_done: false,
        }
    }
}

/// Unit facing vector, turned smoothly; kept out of `Transform` so sprites
/// never roll.
#[derive(Component, Debug, Clone, Copy)]
pub struct Facing(pub Vec2);

/// Countdown from Dying to removal.
#[derive(Component, Debug)]
pub struct DespawnTimer(pub Timer);

/// Marker: entity should be removed from the world.
///
/// We don't despawn inside the fixed step; we mark and despawn later in
/// PostUpdate so no queued work targets a missing entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct PendingDespawn;

pub fn plugin(app: &mut App) {
    app.init_resource::<Messages<AnimCommand>>();
    app.init_resource::<Messages<AnimSignal>>();
    app.add_systems(
        PostUpdate,
        (update_messages::<AnimCommand>, update_messages::<AnimSignal>),
    );

    app.add_systems(OnEnter(GameState::InGame), spawn_enemies);

    // One fixed tick, strict order: signals land in flags, the FSM decides,
    // steering moves, the animation collaborator advances, despawn timers run.
    app.add_systems(
        FixedUpdate,
        (
            apply_anim_signals,
            enemy_fsm_tick,
            nav::steer,
            anim::drive_clips,
            tick_despawn_timers,
        )
            .chain()
            .run_if(in_state(GameState::InGame)),
    );

    // Melee impacts resolve alongside projectile hits; combat::apply_damage
    // is ordered after both.
    app.add_systems(
        FixedPostUpdate,
        deal_impact_damage.run_if(in_state(GameState::InGame)),
    );

    app.add_systems(
        PostUpdate,
        despawn_marked.run_if(in_state(GameState::InGame)),
    );
}

fn update_messages<M: Message>(mut msgs: ResMut<Messages<M>>) {
    msgs.update();
}

fn enemy_layers() -> CollisionLayers {
    CollisionLayers::new(
        Layer::Enemy,
        [Layer::World, Layer::Player, Layer::PlayerProjectile],
    )
}

/// Collision layers for an enemy that should no longer interact with
/// anything: membership stays Enemy, filters become empty. No structural
/// change, interactions stop immediately.
fn non_interacting_enemy_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Enemy, [] as [Layer; 0])
}

fn spawn_enemies(mut commands: Commands) {
    for (i, pos) in [
        Vec2::new(-420.0, 220.0),
        Vec2::new(0.0, 320.0),
        Vec2::new(440.0, 180.0),
    ]
    .into_iter()
    .enumerate()
    {
        let tunables = EnemyTunables::default();

        commands.spawn((
            Name::new(format!("Enemy{i}")),
            Enemy::default(),
            Health::new(tunables.max_hp),
            Facing(Vec2::NEG_Y),
            NavAgent::new(tunables.move_speed),
            tunables,
            AnimPlayer::default(),
            Sprite {
                color: Color::srgb(0.9, 0.25, 0.25),
                custom_size: Some(Vec2::splat(32.0)),
                ..default()
            },
            Transform::from_translation(pos.extend(1.0)),
            RigidBody::Kinematic,
            Collider::circle(BODY_RADIUS),
            enemy_layers(),
            LinearVelocity::ZERO,
            Occluder2d::circle(BODY_RADIUS),
            DespawnOnExit(GameState::InGame),
        ));
    }
}

/// Fold buffered done-signals into per-entity flags before the FSM reads them.
pub fn apply_anim_signals(
    mut reader: MessageReader<AnimSignal>,
    mut q: Query<&mut Enemy>,
) {
    for sig in reader.read() {
        let Ok(mut enemy) = q.get_mut(sig.entity) else {
            continue;
        };
        match sig.kind {
            AnimSignalKind::AttackDone => enemy.attack_done = true,
            AnimSignalKind::KickDone => enemy.kick_done = true,
            AnimSignalKind::AttackImpact | AnimSignalKind::KickImpact => {}
        }
    }
}

pub fn enemy_fsm_tick(
    time: Res<Time<Fixed>>,
    spatial: SpatialQuery,
    player_handle: Option<Res<PlayerEntity>>,
    mut rng: ResMut<GameRng>,
    mut commands: Commands,
    mut anim_out: MessageWriter<AnimCommand>,
    mut deaths: MessageWriter<EnemyDied>,
    mut q_enemies: Query<
        (
            Entity,
            &mut Enemy,
            &EnemyTunables,
            &Health,
            &mut Facing,
            &mut NavAgent,
            &Transform,
        ),
        Without<Player>,
    >,
    q_player: Query<&Transform, (With<Player>, Without<Enemy>)>,
) {
    let dt = time.delta_secs();
    let player = player_handle.as_deref().and_then(|p| p.0);

    for (entity, mut enemy, tunables, health, mut facing, mut nav, tf) in &mut q_enemies {
        // 1. Terminal: a dying enemy is frozen except for its despawn timer.
        if enemy.state == EnemyState::Dying {
            continue;
        }

        // 2. Global death check overrides anything staged this tick.
        if health.is_depleted() {
            enemy.next_state = Some(EnemyState::Dying);
        }

        // 3. Time in state.
        enemy.state_time += dt;

        // 4. Perception, fresh every tick. A missing player degrades to
        // "nothing in sight" rather than failing the tick.
        let my_pos = tf.translation.truncate();
        let player_pos = player
            .and_then(|p| q_player.get(p).ok())
            .map(|t| t.translation.truncate());

        let in_sight = match (player, player_pos) {
            (Some(p), Some(pos)) => {
                perception::player_in_sight(&spatial, entity, my_pos, facing.0, p, pos, tunables)
            }
            _ => false,
        };

        // 5. Decision table, evaluated once if nothing is staged yet.
        if enemy.next_state.is_none() {
            match enemy.state {
                EnemyState::None => {}

                EnemyState::Idle => {
                    if in_sight {
                        enemy.next_state = Some(EnemyState::Chase);
                    } else if enemy.state_time >= tunables.patrol_wait_time {
                        enemy.next_state = Some(EnemyState::Patrol);
                    }
                }

                EnemyState::Patrol => {
                    if in_sight {
                        enemy.next_state = Some(EnemyState::Chase);
                    } else if nav.has_arrived(my_pos) {
                        enemy.next_state = Some(EnemyState::Idle);
                    }
                }

                EnemyState::Chase => {
                    let in_melee = player_pos.is_some_and(|pos| {
                        perception::in_melee_range(my_pos, pos, tunables.attack_range)
                    });

                    if in_melee {
                        if rng.chance(tunables.kick_probability) {
                            debug!("{entity:?}: kick attack selected");
                            enemy.next_state = Some(EnemyState::Martelo);
                        } else {
                            enemy.next_state = Some(EnemyState::Attack);
                        }
                    } else if !in_sight {
                        enemy.next_state = Some(EnemyState::Idle);
                    }
                }

                EnemyState::Attack => {
                    if enemy.attack_done || enemy.state_time >= tunables.attack_timeout {
                        if !enemy.attack_done {
                            warn!(
                                "{entity:?}: attack timed out; check the animation signal wiring"
                            );
                        }
                        enemy.attack_done = false;
                        // Sighted targets are re-engaged through Chase whether
                        // or not they are still in melee range; Chase picks
                        // the next attack.
                        enemy.next_state = Some(if in_sight {
                            EnemyState::Chase
                        } else {
                            EnemyState::Idle
                        });
                    }
                }

                EnemyState::Martelo => {
                    if enemy.kick_done || enemy.state_time >= tunables.attack_timeout {
                        if !enemy.kick_done {
                            warn!("{entity:?}: kick timed out; check the animation signal wiring");
                        }
                        enemy.kick_done = false;
                        enemy.next_state = Some(if in_sight {
                            EnemyState::Chase
                        } else {
                            EnemyState::Idle
                        });
                    }
                }

                EnemyState::Dying => {}
            }
        }

        // 6. Apply the staged transition and run its entry action once.
        if let Some(next) = enemy.next_state.take() {
            enemy.state = next;
            enemy.state_time = 0.0;

            match next {
                EnemyState::None => {}

                EnemyState::Idle => {
                    nav.stop();
                    anim_out.write(AnimCommand {
                        entity,
                        kind: AnimCommandKind::SetMoving(false),
                    });
                }

                EnemyState::Patrol => {
                    nav.resume();
                    match nav::sample_reachable_point(
                        &spatial,
                        &mut rng,
                        my_pos,
                        tunables.patrol_range,
                    ) {
                        Some(point) => nav.set_destination(point),
                        None => {
                            // A stale destination (say, the player's last
                            // chased position) must not be walked to.
                            nav.clear_destination();
                            debug!("{entity:?}: no reachable patrol point; waiting in place");
                        }
                    }
                    anim_out.write(AnimCommand {
                        entity,
                        kind: AnimCommandKind::SetMoving(true),
                    });
                }

                EnemyState::Chase => {
                    nav.resume();
                    anim_out.write(AnimCommand {
                        entity,
                        kind: AnimCommandKind::SetMoving(true),
                    });
                }

                EnemyState::Attack => {
                    nav.stop();
                    enemy.attack_done = false;
                    anim_out.write(AnimCommand {
                        entity,
                        kind: AnimCommandKind::SetMoving(false),
                    });
                    anim_out.write(AnimCommand {
                        entity,
                        kind: AnimCommandKind::TriggerAttack,
                    });
                }

                EnemyState::Martelo => {
                    nav.stop();
                    enemy.kick_done = false;
                    anim_out.write(AnimCommand {
                        entity,
                        kind: AnimCommandKind::SetMoving(false),
                    });
                    anim_out.write(AnimCommand {
                        entity,
                        kind: AnimCommandKind::TriggerKick,
                    });
                }

                EnemyState::Dying => {
                    nav.stop();
                    anim_out.write(AnimCommand {
                        entity,
                        kind: AnimCommandKind::SetMoving(false),
                    });
                    anim_out.write(AnimCommand {
                        entity,
                        kind: AnimCommandKind::TriggerDying,
                    });
                    deaths.write(EnemyDied { entity });
                    // Layer overwrite goes through Commands: SpatialQuery
                    // already holds read access to collider data this tick.
                    commands.entity(entity).insert((
                        non_interacting_enemy_layers(),
                        DespawnTimer(Timer::from_seconds(DESPAWN_DELAY, TimerMode::Once)),
                    ));
                }
            }
        }

        // 7. Chase keeps the destination and the facing on the target.
        if enemy.state == EnemyState::Chase {
            if let Some(pos) = player_pos {
                nav.set_destination(pos);
                facing.0 = turn_toward(facing.0, pos - my_pos, TURN_RATE * dt);
            }
        }
    }
}

/// Close `fraction` of the remaining angle toward `target_dir` (clamped to 1).
fn turn_toward(facing: Vec2, target_dir: Vec2, fraction: f32) -> Vec2 {
    if target_dir.length_squared() < 1e-6 {
        return facing;
    }
    let step = facing.angle_to(target_dir) * fraction.clamp(0.0, 1.0);
    Vec2::from_angle(step).rotate(facing)
}

/// Apply melee damage at the animation impact frame, re-checking range at
/// that moment: the staged decision is stale if the player has moved.
pub fn deal_impact_damage(
    mut reader: MessageReader<AnimSignal>,
    player_handle: Option<Res<PlayerEntity>>,
    q_enemies: Query<(&Transform, &EnemyTunables), With<Enemy>>,
    q_player: Query<&Transform, With<Player>>,
    mut damage: MessageWriter<DamageMessage>,
) {
    let Some(player) = player_handle.as_deref().and_then(|p| p.0) else {
        return;
    };
    let Ok(player_tf) = q_player.get(player) else {
        return;
    };
    let player_pos = player_tf.translation.truncate();

    for sig in reader.read() {
        let amount_of = |t: &EnemyTunables| match sig.kind {
            AnimSignalKind::AttackImpact => Some(t.attack_damage),
            AnimSignalKind::KickImpact => Some(t.kick_damage),
            _ => None,
        };

        let Ok((tf, tunables)) = q_enemies.get(sig.entity) else {
            continue;
        };
        let Some(amount) = amount_of(tunables) else {
            continue;
        };

        if perception::in_melee_range(tf.translation.truncate(), player_pos, tunables.attack_range)
        {
            damage.write(DamageMessage { target: player, amount });
        } else {
            debug!("{:?}: impact missed, player out of melee range", sig.entity);
        }
    }
}

fn tick_despawn_timers(
    time: Res<Time<Fixed>>,
    mut commands: Commands,
    mut q: Query<(Entity, &mut DespawnTimer), Without<PendingDespawn>>,
) {
    for (e, mut timer) in &mut q {
        timer.0.tick(time.delta());
        if timer.0.is_finished() {
            commands.entity(e).insert(PendingDespawn);
        }
    }
}

/// Centralized structural cleanup.
fn despawn_marked(mut commands: Commands, q: Query<Entity, With<PendingDespawn>>) {
    for e in &q {
        commands.entity(e).despawn();
    }
}
