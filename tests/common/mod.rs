//! Integration test harness.
//!
//! Keep integration tests headless:
//! - `MinimalPlugins` provides core ECS runtime.
//! - we then call `punch_hell::game::configure_headless` to install gameplay plugins.
//!
//! There is no `InputPlugin`, so tests drive the avatar by writing `AvatarInput`.

#![allow(dead_code)]

use bevy::asset::AssetPlugin;
use bevy::prelude::*;
use bevy::scene::ScenePlugin;
use bevy::state::app::StatesPlugin;

use punch_hell::plugins::avatar::{AvatarEntity, AvatarInput, AvatarState};

pub fn app_headless() -> App {
    let mut app = App::new();

    // Add AssetPlugin + ScenePlugin so SceneSpawner exists.
    app.add_plugins((
        MinimalPlugins,
        StatesPlugin,
        AssetPlugin::default(),
        ScenePlugin,
    ));

    punch_hell::game::configure_headless(&mut app);
    app
}

/// Headless app ticked once, so `OnEnter(InGame)` has spawned the avatar.
pub fn app_in_game() -> (App, Entity) {
    let mut app = app_headless();
    app.update();

    let avatar = app
        .world()
        .resource::<AvatarEntity>()
        .0
        .expect("avatar spawned on entering InGame");
    (app, avatar)
}

pub fn set_input(app: &mut App, f: impl FnOnce(&mut AvatarInput)) {
    f(&mut app.world_mut().resource_mut::<AvatarInput>());
}

pub fn avatar_state(app: &App, avatar: Entity) -> &AvatarState {
    app.world().get::<AvatarState>(avatar).unwrap()
}
