//! Projectile boundary types.
//!
//! Bullet patterns and emission live outside the avatar core. What the core needs
//! is a way to tell enemy bullets from the avatar's own, and a switch per turret
//! emitter that the shooting gate can flip.

use avian2d::prelude::*;
use bevy::prelude::*;

use crate::common::layers::Layer;

/// An enemy projectile. Touching the hitbox damages; touching the graze ring scores.
#[derive(Component, Debug, Clone, Copy)]
pub struct EnemyBullet;

/// A projectile fired by one of the avatar's turret emitters.
#[derive(Component, Debug, Clone, Copy)]
pub struct PlayerBullet {
    pub emitter: Entity,
}

/// A turret-mounted emitter.
///
/// The shooting gate flips `firing` on every emitter alike. An unmounted emitter
/// (turret not fitted) never fires, whatever the gate says. Emission systems
/// outside the avatar core read `is_firing` only.
#[derive(Component, Debug, Clone)]
pub struct BulletEmitter {
    firing: bool,
    mounted: bool,
}

impl Default for BulletEmitter {
    fn default() -> Self {
        Self::with_mounted(true)
    }
}

impl BulletEmitter {
    pub fn with_mounted(mounted: bool) -> Self {
        Self {
            firing: false,
            mounted,
        }
    }

    #[inline]
    pub fn set_firing(&mut self, on: bool) {
        self.firing = on;
    }

    #[inline]
    pub fn set_mounted(&mut self, mounted: bool) {
        self.mounted = mounted;
    }

    #[inline]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    #[inline]
    pub fn is_firing(&self) -> bool {
        self.firing && self.mounted
    }
}

/// Layers for enemy bullets. Used by the bullet-pattern side when it spawns them.
#[inline]
pub fn enemy_bullet_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::EnemyBullet, [Layer::Avatar, Layer::Graze])
}

/// Layers for bullets fired from turret emitters. Used by the emission side.
#[inline]
pub fn player_bullet_layers() -> CollisionLayers {
    CollisionLayers::new(Layer::PlayerBullet, [Layer::Enemy])
}

#[cfg(test)]
mod tests;
