//! Buffered animation signals.
//!
//! The state machine and the animation collaborator never call each other
//! directly. The FSM enqueues `AnimCommand` intent; the collaborator reports
//! back with `AnimSignal`. Both are double-buffered messages drained once per
//! tick, so there is no callback subscription whose lifetime could leak.

use bevy::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimCommandKind {
    SetMoving(bool),
    TriggerAttack,
    TriggerKick,
    TriggerDying,
}

/// FSM -> animation collaborator.
#[derive(Message, Clone, Copy, Debug)]
pub struct AnimCommand {
    pub entity: Entity,
    pub kind: AnimCommandKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimSignalKind {
    /// Mid-clip frame of the regular attack; damage is applied here, not at
    /// attack start, and melee range is re-checked at this moment.
    AttackImpact,
    /// Mid-clip frame of the kick.
    KickImpact,
    AttackDone,
    KickDone,
}

/// Animation collaborator -> FSM / combat.
#[derive(Message, Clone, Copy, Debug)]
pub struct AnimSignal {
    pub entity: Entity,
    pub kind: AnimSignalKind,
}
