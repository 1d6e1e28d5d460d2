//! Seedable random number source.
//!
//! All gameplay randomness (attack selection, patrol point sampling) goes
//! through this resource so a fixed seed reproduces the same run.

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Resource, Debug)]
pub struct GameRng {
    rng: StdRng,
    /// The seed used to initialize this RNG (if deterministic).
    pub seed: Option<u64>,
}

impl GameRng {
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), seed: Some(seed) }
    }

    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy(), seed: None }
    }

    /// Bernoulli roll. `p` is clamped to `0.0..=1.0`.
    pub fn chance(&mut self, p: f32) -> bool {
        self.rng.gen_bool(p.clamp(0.0, 1.0) as f64)
    }

    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        debug_assert!(hi >= lo);
        if hi <= lo { lo } else { self.rng.gen_range(lo..hi) }
    }

    /// Uniform point inside a disc of the given radius, centered on origin.
    pub fn in_disc(&mut self, radius: f32) -> Vec2 {
        let angle = self.range(0.0, std::f32::consts::TAU);
        let r = radius * self.range(0.0f32, 1.0).sqrt();
        Vec2::from_angle(angle) * r
    }
}

impl Default for GameRng {
    fn default() -> Self {
        Self::from_entropy()
    }
}
