//! Pickups: collectible drops the avatar can touch.
//!
//! Drop spawning belongs to the stage/enemy side. This module only defines what a
//! pickup *is* so the avatar's trigger resolution can classify it.

use avian2d::prelude::*;
use bevy::prelude::*;
use bevy::state::state_scoped::DespawnOnExit;

use crate::common::{layers::Layer, state::GameState};

/// Anything on the pickup layer. Its kind is a separate component; a pickup
/// without a recognised `PickupKind` is ignored on contact.
#[derive(Component, Debug, Clone, Copy)]
pub struct Pickup;

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PickupKind {
    /// Raises power.
    Power,
    /// Score drop from a destroyed enemy.
    Point,
    /// Small score drop left behind by cancelled bullets.
    BulletPoint,
}

impl PickupKind {
    fn color(self) -> Color {
        match self {
            PickupKind::Power => Color::srgb(0.95, 0.3, 0.3),
            PickupKind::Point => Color::srgb(0.35, 0.55, 1.0),
            PickupKind::BulletPoint => Color::srgb(0.9, 0.9, 0.5),
        }
    }
}

#[inline]
pub fn pickup_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::Pickup, [Layer::Avatar])
}

/// Spawn a pickup of `kind` at `pos`.
///
/// Called by whatever drops loot (destroyed enemies, cancelled bullets); the avatar
/// core only collects.
pub fn spawn_pickup(commands: &mut Commands, kind: PickupKind, pos: Vec2) -> Entity {
    commands
        .spawn((
            Name::new(format!("Pickup({kind:?})")),
            Pickup,
            kind,
            Sprite {
                color: kind.color(),
                custom_size: Some(Vec2::splat(10.0)),
                ..default()
            },
            Transform::from_translation(pos.extend(1.5)),
            RigidBody::Kinematic,
            Collider::circle(6.0),
            Sensor,
            pickup_layers(),
            DespawnOnExit(GameState::InGame),
        ))
        .id()
}
