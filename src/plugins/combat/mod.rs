//! Combat glue: damage application, death latching, kill counting, and the
//! win/lose flow.
//!
//! Damage never mutates `Health` at the point of detection. Producers
//! (projectile collisions, enemy melee impacts) write `DamageMessage`s and a
//! single consumer applies them, so terminal-state gating lives in exactly
//! one place.

use bevy::ecs::message::Messages;
use bevy::prelude::*;
use bevy::time::Virtual;

use crate::common::state::GameState;
use crate::plugins::enemies::{Enemy, EnemyState};
use crate::plugins::player::Player;
use crate::plugins::projectiles::collision::process_projectile_collisions;

#[derive(Component, Debug, Clone)]
pub struct Health {
    pub hp: f32,
    pub max_hp: f32,
}

impl Health {
    pub fn new(max_hp: f32) -> Self {
        Self { hp: max_hp, max_hp }
    }

    /// HP as shown at observable boundaries (HUD, logs). The raw value may
    /// dip below zero for the tick between damage and the death transition.
    pub fn observable_hp(&self) -> f32 {
        self.hp.clamp(0.0, self.max_hp)
    }

    pub fn is_depleted(&self) -> bool {
        self.hp <= 0.0
    }

    pub fn heal(&mut self, amount: f32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }
}

/// One-way death latch for the player.
#[derive(Component, Debug, Clone, Copy)]
pub struct Dead;

#[derive(Message, Clone, Copy, Debug)]
pub struct DamageMessage {
    pub target: Entity,
    pub amount: f32,
}

#[derive(Message, Clone, Copy, Debug)]
pub struct HealMessage {
    pub target: Entity,
    pub amount: f32,
}

/// Written exactly once per enemy, when its state machine enters Dying.
#[derive(Message, Clone, Copy, Debug)]
pub struct EnemyDied {
    pub entity: Entity,
}

#[derive(Resource, Debug, Clone)]
pub struct Score {
    pub kills: u32,
    pub kills_for_victory: u32,
}

impl Default for Score {
    fn default() -> Self {
        Self { kills: 0, kills_for_victory: 3 }
    }
}

pub fn plugin(app: &mut App) {
    app.init_resource::<Score>();

    app.init_resource::<Messages<DamageMessage>>();
    app.init_resource::<Messages<HealMessage>>();
    app.init_resource::<Messages<EnemyDied>>();
    app.add_systems(
        PostUpdate,
        (
            update_messages::<DamageMessage>,
            update_messages::<HealMessage>,
            update_messages::<EnemyDied>,
        ),
    );

    // Damage resolves after every producer of this fixed tick has run:
    // projectile hits and melee impacts both land in FixedPostUpdate.
    app.add_systems(
        FixedPostUpdate,
        apply_damage
            .after(process_projectile_collisions)
            .after(crate::plugins::enemies::deal_impact_damage)
            .run_if(in_state(GameState::InGame)),
    );
    app.add_systems(
        FixedPostUpdate,
        (apply_heals, player_death_latch, track_kills)
            .after(apply_damage)
            .run_if(in_state(GameState::InGame)),
    );

    app.add_systems(OnEnter(GameState::Victory), announce_victory);
    app.add_systems(OnEnter(GameState::GameOver), announce_game_over);
    app.add_systems(OnEnter(GameState::Victory), freeze_time);
    app.add_systems(OnEnter(GameState::GameOver), freeze_time);
    app.add_systems(
        Update,
        restart_on_key.run_if(not(in_state(GameState::InGame))),
    );
}

fn update_messages<M: Message>(mut msgs: ResMut<Messages<M>>) {
    msgs.update();
}

/// Single writer for HP. Terminal targets (a Dying enemy, a dead player)
/// ignore damage entirely.
pub fn apply_damage(
    mut reader: MessageReader<DamageMessage>,
    mut q: Query<(&mut Health, Option<&Enemy>, Has<Dead>)>,
) {
    for msg in reader.read() {
        let Ok((mut health, enemy, dead)) = q.get_mut(msg.target) else {
            debug!("damage target {:?} has no Health; dropped", msg.target);
            continue;
        };

        if dead || enemy.is_some_and(|e| e.state == EnemyState::Dying) {
            continue;
        }

        health.hp -= msg.amount;
        debug!(
            "{:?} took {} damage, {}/{} hp",
            msg.target,
            msg.amount,
            health.observable_hp(),
            health.max_hp
        );
    }
}

pub fn apply_heals(
    mut reader: MessageReader<HealMessage>,
    mut q: Query<(&mut Health, Option<&Enemy>, Has<Dead>)>,
) {
    for msg in reader.read() {
        let Ok((mut health, enemy, dead)) = q.get_mut(msg.target) else {
            continue;
        };

        if dead || enemy.is_some_and(|e| e.state == EnemyState::Dying) {
            continue;
        }

        health.heal(msg.amount);
    }
}

/// Latch `Dead` exactly once and stage game over.
pub fn player_death_latch(
    mut commands: Commands,
    mut next: ResMut<NextState<GameState>>,
    q: Query<(Entity, &Health), (With<Player>, Without<Dead>)>,
) {
    for (e, health) in &q {
        if health.is_depleted() {
            commands.entity(e).insert(Dead);
            info!("player died");
            next.set(GameState::GameOver);
        }
    }
}

pub fn track_kills(
    mut reader: MessageReader<EnemyDied>,
    mut score: ResMut<Score>,
    state: Res<State<GameState>>,
    mut next: ResMut<NextState<GameState>>,
) {
    for died in reader.read() {
        score.kills += 1;
        info!(
            "enemy {:?} down: {}/{}",
            died.entity, score.kills, score.kills_for_victory
        );

        if score.kills >= score.kills_for_victory && *state.get() == GameState::InGame {
            next.set(GameState::Victory);
        }
    }
}

fn announce_victory(score: Res<Score>) {
    info!("VICTORY! {} enemies defeated. Press R to restart.", score.kills);
}

fn announce_game_over() {
    info!("GAME OVER. Press R to restart.");
}

/// Fixed-schedule simulation consumes virtual time, so zero speed freezes the
/// whole arena while Update-schedule systems (the restart key) keep running.
fn freeze_time(mut virtual_time: ResMut<Time<Virtual>>) {
    virtual_time.set_relative_speed(0.0);
}

fn restart_on_key(
    keys: Option<Res<ButtonInput<KeyCode>>>,
    mut virtual_time: ResMut<Time<Virtual>>,
    mut score: ResMut<Score>,
    mut next: ResMut<NextState<GameState>>,
) {
    let Some(keys) = keys else { return };
    if !keys.just_pressed(KeyCode::KeyR) {
        return;
    }

    virtual_time.set_relative_speed(1.0);
    score.kills = 0;
    next.set(GameState::InGame);
}

#[cfg(test)]
mod tests;
