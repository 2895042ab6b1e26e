//! Tunable gameplay constants.
//!
//! Speeds are in pixels per second, durations in seconds.

use bevy::prelude::*;

#[derive(Resource, Debug, Clone)]
pub struct Tunables {
    pub pixels_per_meter: f32,

    // Movement tiers.
    pub move_speed: f32,
    pub slow_move_speed: f32,
    pub roll_move_speed: f32,

    // Timer bank.
    pub roll_time_max: f32,
    pub invincibility_time: f32,
    pub graze_cooldown: f32,
    /// Roll charge required (and consumed in full) to start a roll.
    pub roll_charge_threshold: u32,

    // Ledger deltas.
    pub power_per_pickup: u32,
    pub score_per_drop: u64,
    pub score_per_destroyed_bullet: u64,
    /// Also credited as roll charge.
    pub score_per_graze: u32,

    // Blink feedback.
    pub blink_cycles: u16,
    pub blink_ticks_per_phase: u8,
    pub blink_dim_alpha: f32,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            pixels_per_meter: 20.0,
            move_speed: 360.0,
            slow_move_speed: 160.0,
            roll_move_speed: 420.0,
            roll_time_max: 1.5,
            invincibility_time: 2.0,
            graze_cooldown: 0.02,
            roll_charge_threshold: 100,
            power_per_pickup: 10,
            score_per_drop: 20,
            score_per_destroyed_bullet: 1,
            score_per_graze: 1,
            blink_cycles: 60,
            blink_ticks_per_phase: 2,
            blink_dim_alpha: 0.1,
        }
    }
}
