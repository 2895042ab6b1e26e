//! Feature plugins.

use bevy::prelude::*;

pub mod audio;
pub mod avatar;
pub mod core;
pub mod physics;
pub mod pickups;
pub mod projectiles;
pub mod stage;

// Render-only
pub mod camera;
pub mod lighting;

/// Register gameplay plugins that work in headless tests.
pub fn register_gameplay(app: &mut App) {
    core::plugin(app);
    physics::plugin(app);
    stage::plugin(app);
    audio::plugin(app);
    avatar::plugin(app);
}

/// Register render-only plugins (requires DefaultPlugins / render infra).
pub fn register_render(app: &mut App) {
    lighting::plugin(app);
    camera::plugin(app);
    audio::backend_plugin(app);
}

