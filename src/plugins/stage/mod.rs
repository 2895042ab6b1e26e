//! Stage plugin: the session ledger (score, lives, power, roll charge) and the
//! global `paused` / `dialogue_active` flags.
//!
//! The avatar core never owns these counters. It only issues deltas through the
//! methods below, so every mutation has one obvious entry point.

use bevy::prelude::*;

use crate::common::state::GameState;

pub const STARTING_LIVES: i32 = 3;

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct StageLedger {
    pub lives_remaining: i32,
    pub score: u64,
    pub power: u32,
    pub roll_charge: u32,
    /// A modal dialogue suppresses firing and pausing.
    pub dialogue_active: bool,
    pub paused: bool,
}

impl Default for StageLedger {
    fn default() -> Self {
        Self {
            lives_remaining: STARTING_LIVES,
            score: 0,
            power: 0,
            roll_charge: 0,
            dialogue_active: false,
            paused: false,
        }
    }
}

impl StageLedger {
    #[inline]
    pub fn add_score(&mut self, amount: u64) {
        self.score = self.score.saturating_add(amount);
    }

    #[inline]
    pub fn add_power(&mut self, amount: u32) {
        self.power = self.power.saturating_add(amount);
    }

    #[inline]
    pub fn add_roll(&mut self, amount: u32) {
        self.roll_charge = self.roll_charge.saturating_add(amount);
    }

    /// Empty the roll charge, returning what was there.
    #[inline]
    pub fn take_roll_charge(&mut self) -> u32 {
        std::mem::take(&mut self.roll_charge)
    }

    /// Lives may go below zero; game-over handling belongs to the stage flow.
    #[inline]
    pub fn lose_life(&mut self) {
        self.lives_remaining -= 1;
    }

    /// Flip `paused`. Refused while a dialogue is up. Returns whether it flipped.
    pub fn toggle_pause(&mut self) -> bool {
        if self.dialogue_active {
            return false;
        }
        self.paused = !self.paused;
        true
    }
}

pub fn plugin(app: &mut App) {
    app.insert_resource(StageLedger::default()).add_systems(
        PostUpdate,
        sync_virtual_time.run_if(in_state(GameState::InGame)),
    );
}

/// Mirror `StageLedger::paused` onto virtual time.
///
/// Everything driven by `Time` (avatar timers, blink, movement) freezes with it.
fn sync_virtual_time(ledger: Res<StageLedger>, mut virtual_time: ResMut<Time<Virtual>>) {
    if !ledger.is_changed() {
        return;
    }

    if ledger.paused && !virtual_time.is_paused() {
        info!("stage paused");
        virtual_time.pause();
    } else if !ledger.paused && virtual_time.is_paused() {
        info!("stage resumed");
        virtual_time.unpause();
    }
}
