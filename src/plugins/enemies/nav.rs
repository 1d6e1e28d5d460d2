//! Navigation collaborator: straight-line steering toward a destination.
//!
//! Stands in for a full navmesh agent (pathfinding proper is out of scope
//! here); the FSM only talks to the `NavAgent` surface: set a destination,
//! stop/resume, ask how far is left and whether a path is still pending.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::layers::Layer;
use crate::common::rng::GameRng;

use super::Enemy;

/// Within this distance of the destination, the agent counts as arrived.
pub const ARRIVE_DISTANCE: f32 = 10.0;

const SAMPLE_ATTEMPTS: usize = 10;

#[derive(Component, Debug)]
pub struct NavAgent {
    pub destination: Option<Vec2>,
    /// True for the tick after a destination was set, mirroring the one-frame
    /// path-computation window of a real agent. Arrival checks must not fire
    /// while pending.
    pub pending: bool,
    pub stopped: bool,
    pub speed: f32,
}

impl NavAgent {
    pub fn new(speed: f32) -> Self {
        Self { destination: None, pending: false, stopped: true, speed }
    }

    pub fn set_destination(&mut self, point: Vec2) {
        self.destination = Some(point);
        self.pending = true;
    }

    pub fn stop(&mut self) {
        self.stopped = true;
    }

    /// Drop the current destination, e.g. when no replacement could be
    /// sampled. A stale point must never be walked to.
    pub fn clear_destination(&mut self) {
        self.destination = None;
        self.pending = false;
    }

    pub fn resume(&mut self) {
        self.stopped = false;
    }

    pub fn has_arrived(&self, from: Vec2) -> bool {
        if self.pending {
            return false;
        }
        // No destination leaves nothing to walk to.
        self.destination.is_none_or(|d| d.distance(from) <= ARRIVE_DISTANCE)
    }
}

/// FixedUpdate steering: move toward the destination at agent speed.
/// Runs after the FSM tick, so a destination set this tick clears `pending`
/// on the next one.
pub fn steer(
    mut q: Query<(&mut NavAgent, &Transform, &mut LinearVelocity), With<Enemy>>,
) {
    for (mut nav, tf, mut vel) in &mut q {
        nav.pending = false;

        if nav.stopped {
            vel.0 = Vec2::ZERO;
            continue;
        }

        let Some(dest) = nav.destination else {
            vel.0 = Vec2::ZERO;
            continue;
        };

        let to_dest = dest - tf.translation.truncate();
        if to_dest.length() <= ARRIVE_DISTANCE {
            vel.0 = Vec2::ZERO;
            continue;
        }

        vel.0 = to_dest.normalize() * nav.speed;
    }
}

/// Random reachable point within `range` of `center`: a candidate is valid
/// when it does not land inside world geometry. Bounded resampling; `None`
/// means the caller should skip moving this cycle.
pub fn sample_reachable_point(
    spatial: &SpatialQuery,
    rng: &mut GameRng,
    center: Vec2,
    range: f32,
) -> Option<Vec2> {
    let filter = SpatialQueryFilter::from_mask(Layer::World);

    for _ in 0..SAMPLE_ATTEMPTS {
        let candidate = center + rng.in_disc(range);
        if spatial.point_intersections(candidate, &filter).is_empty() {
            return Some(candidate);
        }
    }

    None
}
