//! Lighting plugin (Firefly) (render-only).
//!
//! A point light rides with the avatar and is tinted by its invulnerability
//! state, so a roll or the post-hit window reads at a glance.

use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;
use bevy_firefly::prelude::*;

use crate::common::state::GameState;
use crate::plugins::avatar::invulnerability::Invulnerability;
use crate::plugins::avatar::{Avatar, AvatarState};

#[derive(Component)]
pub struct AvatarLight;

pub fn plugin(app: &mut App) {
    if !app.is_plugin_added::<FireflyPlugin>() {
        app.add_plugins(FireflyPlugin);
    }

    app.add_systems(OnEnter(GameState::InGame), setup)
        .add_systems(Update, follow_avatar_light.run_if(in_state(GameState::InGame)));
}

pub fn light_color(state: Invulnerability) -> Color {
    match state {
        Invulnerability::Normal => Color::srgb(1.0, 0.9, 0.75),
        Invulnerability::Rolling => Color::srgb(0.55, 0.9, 1.0),
        Invulnerability::PostHitInvincible => Color::srgb(1.0, 0.45, 0.4),
    }
}

fn setup(mut commands: Commands) {
    commands.spawn((
        Name::new("AvatarLight"),
        AvatarLight,
        PointLight2d {
            color: light_color(Invulnerability::Normal),
            radius: 320.0,
            ..default()
        },
        Transform::from_xyz(0.0, 0.0, 10.0),
        DespawnOnExit(GameState::InGame),
    ));
}

fn follow_avatar_light(
    q_avatar: Query<(&Transform, &AvatarState), (With<Avatar>, Without<AvatarLight>)>,
    mut q_light: Query<(&mut Transform, &mut PointLight2d), (With<AvatarLight>, Without<Avatar>)>,
) {
    let Ok((tf_avatar, state)) = q_avatar.single() else {
        return;
    };
    let Ok((mut tf_light, mut light)) = q_light.single_mut() else {
        return;
    };

    tf_light.translation.x = tf_avatar.translation.x;
    tf_light.translation.y = tf_avatar.translation.y;
    light.color = light_color(state.invulnerability());
}
