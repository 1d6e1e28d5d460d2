//! Core plugin: shared resources and global settings.

use crate::common::rng::GameRng;
use crate::common::tunables::{ProjectileTemplate, Tunables};
use bevy::prelude::*;

pub fn plugin(app: &mut App) {
    app.insert_resource(Tunables::default());
    app.insert_resource(ProjectileTemplate::default());
    app.init_resource::<GameRng>();
    app.insert_resource(ClearColor(Color::srgb(0.05, 0.05, 0.07)));
}
