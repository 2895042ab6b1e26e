//! Collision layers.

use avian2d::prelude::*;

#[derive(PhysicsLayer, Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Layer {
    #[default]
    Default,
    /// The avatar's damage hitbox.
    Avatar,
    /// The wider sensor ring used for graze detection.
    Graze,
    Enemy,
    PlayerBullet,
    EnemyBullet,
    Pickup,
}
