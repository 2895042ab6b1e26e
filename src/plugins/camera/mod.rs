//! Camera plugin (render-only): a fixed playfield camera and the viewport
//! bounds the avatar is clamped into.
//!
//! `ViewportBounds` itself is gameplay state and is inserted by the core plugin
//! with a default playfield, so headless apps clamp against that instead.
//!
//! ```text
//! OnEnter(InGame): spawn MainCamera
//! PreUpdate:       refresh ViewportBounds from the orthographic projection
//! Update:          avatar movement clamps into ViewportBounds
//! ```

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::*;

use crate::common::state::GameState;

pub const PLAYFIELD_SIZE: Vec2 = Vec2::new(1280.0, 720.0);

#[derive(Component)]
pub struct MainCamera;

/// World-space rectangle the avatar must stay inside.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ViewportBounds(pub Rect);

impl Default for ViewportBounds {
    fn default() -> Self {
        Self(Rect::from_center_size(Vec2::ZERO, PLAYFIELD_SIZE))
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(OnEnter(GameState::InGame), spawn_camera)
        .add_systems(
            PreUpdate,
            update_viewport_bounds.run_if(in_state(GameState::InGame)),
        );
}

fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Name::new("MainCamera"),
        Camera2d,
        MainCamera,
        FireflyConfig::default(),
        Transform::from_xyz(0.0, 0.0, 999.0),
        DespawnOnExit(GameState::InGame),
    ));
}

/// Orthographic `area` is view-space; offset it by the camera position.
pub fn world_bounds(area: Rect, camera_pos: Vec2) -> Rect {
    Rect {
        min: area.min + camera_pos,
        max: area.max + camera_pos,
    }
}

fn update_viewport_bounds(
    q_camera: Query<(&Projection, &GlobalTransform), With<MainCamera>>,
    mut bounds: ResMut<ViewportBounds>,
) {
    let Ok((projection, tf)) = q_camera.single() else {
        return;
    };
    let Projection::Orthographic(ortho) = projection else {
        return;
    };

    let next = world_bounds(ortho.area, tf.translation().truncate());
    if bounds.0 != next {
        bounds.0 = next;
    }
}
