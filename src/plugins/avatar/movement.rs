//! Movement resolver.
//!
//! Speed tier precedence: slow-move held > rolling > normal.

use std::f32::consts::TAU;

use bevy::prelude::*;

use crate::common::tunables::Tunables;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpeedTier {
    Slow,
    Roll,
    Normal,
}

impl SpeedTier {
    #[inline]
    pub fn select(slow_held: bool, rolling: bool) -> Self {
        if slow_held {
            SpeedTier::Slow
        } else if rolling {
            SpeedTier::Roll
        } else {
            SpeedTier::Normal
        }
    }

    #[inline]
    pub fn speed(self, tunables: &Tunables) -> f32 {
        match self {
            SpeedTier::Slow => tunables.slow_move_speed,
            SpeedTier::Roll => tunables.roll_move_speed,
            SpeedTier::Normal => tunables.move_speed,
        }
    }
}

/// Step `position` along `input` and clamp it into `bounds`.
///
/// `input` is normalized first (zero stays zero), so diagonals are not faster.
/// The clamp is per axis, so sliding along an edge keeps the other axis intact.
pub fn resolve(
    position: Vec2,
    input: Vec2,
    slow_held: bool,
    rolling: bool,
    dt: f32,
    bounds: Rect,
    tunables: &Tunables,
) -> Vec2 {
    let dir = input.normalize_or_zero();
    let speed = SpeedTier::select(slow_held, rolling).speed(tunables);
    let moved = position + dir * speed * dt;
    clamp_to_bounds(moved, bounds)
}

#[inline]
pub fn clamp_to_bounds(p: Vec2, bounds: Rect) -> Vec2 {
    // `Vec2::clamp` asserts min <= max; a degenerate viewport collapses to its min corner.
    Vec2::new(
        p.x.max(bounds.min.x).min(bounds.max.x.max(bounds.min.x)),
        p.y.max(bounds.min.y).min(bounds.max.y.max(bounds.min.y)),
    )
}

/// Cosmetic spin: one full turn over the roll, identity otherwise.
#[inline]
pub fn roll_rotation(progress: Option<f32>) -> Quat {
    match progress {
        Some(t) => Quat::from_rotation_z(t * TAU),
        None => Quat::IDENTITY,
    }
}
