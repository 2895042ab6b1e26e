//! Invulnerability state machine and the post-hit blink.
//!
//! The state is derived from the timer bank every time it is asked for; there is
//! no stored enum that could drift out of sync with the timers.
//!
//! ```text
//! Normal ──start_roll──▶ Rolling ──roll_remaining = 0──▶ Normal
//! Normal ──accepted hit──▶ PostHitInvincible ──invincibility_remaining = 0──▶ Normal
//! ```
//! Hits are rejected in both immune states.

use super::timers::TimerBank;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Invulnerability {
    Normal,
    Rolling,
    PostHitInvincible,
}

impl Invulnerability {
    /// Post-hit wins when both windows overlap; either one grants immunity.
    pub fn of(timers: &TimerBank) -> Self {
        if timers.is_invincible() {
            Invulnerability::PostHitInvincible
        } else if timers.is_rolling() {
            Invulnerability::Rolling
        } else {
            Invulnerability::Normal
        }
    }

    #[inline]
    pub fn is_vulnerable(self) -> bool {
        self == Invulnerability::Normal
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct BlinkRun {
    cycles_left: u16,
    /// Tick within the current dim+full cycle.
    tick: u8,
    ticks_per_phase: u8,
}

/// A repeating dim/full opacity toggle advanced once per frame.
///
/// At most one run exists; starting while active is a no-op.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlinkEffect {
    run: Option<BlinkRun>,
}

impl BlinkEffect {
    /// Returns `false` if a run was already active.
    pub fn start(&mut self, cycles: u16, ticks_per_phase: u8) -> bool {
        if self.run.is_some() || cycles == 0 {
            return false;
        }
        self.run = Some(BlinkRun {
            cycles_left: cycles,
            tick: 0,
            ticks_per_phase: ticks_per_phase.max(1),
        });
        true
    }

    pub fn cancel(&mut self) {
        self.run = None;
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.run.is_some()
    }

    /// Advance one frame and return whether this frame renders dimmed.
    ///
    /// Each cycle is `ticks_per_phase` dimmed frames followed by as many full
    /// frames. The run ends on the last full frame of the last cycle.
    pub fn tick(&mut self) -> bool {
        let Some(run) = &mut self.run else {
            return false;
        };

        let dimmed = run.tick < run.ticks_per_phase;
        run.tick += 1;

        if run.tick >= run.ticks_per_phase.saturating_mul(2) {
            run.tick = 0;
            run.cycles_left -= 1;
            if run.cycles_left == 0 {
                self.run = None;
            }
        }

        dimmed
    }
}

/// On/off latch for a looping feedback channel.
///
/// `set` reports only edges, so a loop is never restarted while already playing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LoopLatch(bool);

impl LoopLatch {
    /// `Some(on)` when the latch flipped, `None` when it already matched.
    #[inline]
    pub fn set(&mut self, on: bool) -> Option<bool> {
        if self.0 == on {
            return None;
        }
        self.0 = on;
        Some(on)
    }

    #[inline]
    pub fn is_on(self) -> bool {
        self.0
    }
}
