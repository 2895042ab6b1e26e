//! Core plugin: shared resources and global settings.

use crate::common::tunables::Tunables;
use crate::plugins::camera::ViewportBounds;
use bevy::prelude::*;

pub fn plugin(app: &mut App) {
    app.init_resource::<Tunables>();
    app.init_resource::<ViewportBounds>();
    app.insert_resource(ClearColor(Color::srgb(0.03, 0.02, 0.06)));
}
