//! Physics plugin: avian2d with a top-down (gravity-free) playfield.
//!
//! Physics is only used for contact detection. The avatar is kinematic and is
//! positioned directly by the movement resolver.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::tunables::Tunables;

pub fn plugin(app: &mut App) {
    let ppm = app.world().resource::<Tunables>().pixels_per_meter;
    app.add_plugins(PhysicsPlugins::default().with_length_unit(ppm));
    app.insert_resource(Gravity(Vec2::ZERO));
}
