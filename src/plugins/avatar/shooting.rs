//! Shooting gate.

use super::invulnerability::LoopLatch;

#[inline]
pub fn firing_enabled(fire_held: bool, dialogue_active: bool) -> bool {
    fire_held && !dialogue_active
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GateOutput {
    pub enabled: bool,
    /// `Some(true)` on the off→on edge, `Some(false)` on on→off, else `None`.
    /// Drives the looping shooting sound.
    pub edge: Option<bool>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShootingGate {
    latch: LoopLatch,
}

impl ShootingGate {
    pub fn evaluate(&mut self, fire_held: bool, dialogue_active: bool) -> GateOutput {
        let enabled = firing_enabled(fire_held, dialogue_active);
        GateOutput {
            enabled,
            edge: self.latch.set(enabled),
        }
    }

    #[inline]
    pub fn is_firing(&self) -> bool {
        self.latch.is_on()
    }

    /// Force the gate closed. Returns the stop edge if it was open.
    pub fn close(&mut self) -> Option<bool> {
        self.latch.set(false)
    }
}
