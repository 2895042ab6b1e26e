//! Timer bank: roll duration, post-hit invincibility, graze cooldown.
//!
//! All three are plain seconds counters advanced by the per-frame driver.
//! Nothing here reads `Time`; callers pass `dt` so the logic stays testable.

use crate::common::tunables::Tunables;
use crate::plugins::stage::StageLedger;

/// Seconds that never go below zero.
///
/// Clamp once on write so readers can compare against zero directly.
#[derive(Clone, Copy, Debug, Default, PartialEq, PartialOrd)]
pub struct Seconds(f32);

impl Seconds {
    pub const ZERO: Self = Self(0.0);

    #[inline]
    pub fn new(v: f32) -> Self {
        Self(v.max(0.0))
    }
    #[inline]
    pub fn get(self) -> f32 {
        self.0
    }
    #[inline]
    pub fn tick_down(&mut self, dt: f32) {
        self.0 = (self.0 - dt).max(0.0);
    }
    #[inline]
    pub fn is_positive(self) -> bool {
        self.0 > 0.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimerBank {
    pub roll_remaining: Seconds,
    pub invincibility_remaining: Seconds,
    /// Time since graze last scored.
    pub graze_accumulator: Seconds,
}

impl TimerBank {
    /// Count the roll and invincibility windows down by `dt`.
    ///
    /// The graze accumulator only grows through `try_graze`.
    pub fn advance(&mut self, dt: f32) {
        self.roll_remaining.tick_down(dt);
        self.invincibility_remaining.tick_down(dt);
    }

    #[inline]
    pub fn is_rolling(&self) -> bool {
        self.roll_remaining.is_positive()
    }

    #[inline]
    pub fn is_invincible(&self) -> bool {
        self.invincibility_remaining.is_positive()
    }

    /// Start a roll if the ledger holds a full charge, consuming all of it.
    ///
    /// Partial charge never rolls. Returns whether the roll started.
    pub fn start_roll(&mut self, ledger: &mut StageLedger, tunables: &Tunables) -> bool {
        if ledger.roll_charge < tunables.roll_charge_threshold {
            return false;
        }

        ledger.take_roll_charge();
        self.roll_remaining = Seconds::new(tunables.roll_time_max);
        true
    }

    pub fn start_invincibility(&mut self, duration: f32) {
        self.invincibility_remaining = Seconds::new(duration);
    }

    /// Accumulate `dt` and report whether the cooldown has elapsed.
    ///
    /// On success the accumulator restarts from zero.
    pub fn try_graze(&mut self, dt: f32, cooldown: f32) -> bool {
        let accumulated = Seconds::new(self.graze_accumulator.get() + dt);
        if accumulated.get() < cooldown {
            self.graze_accumulator = accumulated;
            return false;
        }

        self.graze_accumulator = Seconds::ZERO;
        true
    }

    /// Roll progress in `[0, 1]`, or `None` when not rolling.
    pub fn roll_progress(&self, roll_time_max: f32) -> Option<f32> {
        if !self.is_rolling() {
            return None;
        }
        let max = roll_time_max.max(0.0001);
        Some(((max - self.roll_remaining.get()) / max).clamp(0.0, 1.0))
    }
}
