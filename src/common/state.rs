//! Global state machine.
//!
//! Everything the avatar core spawns is scoped to `InGame` and despawned on exit.

use bevy::prelude::*;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, States, Default)]
pub enum GameState {
    #[default]
    InGame,
}
