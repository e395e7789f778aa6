//! Difficulty progression derived from score
//!
//! Parameters are recomputed from the cumulative score every tick rather
//! than on score thresholds, so a tick that jumps the score past a
//! threshold can never skip the adjustment.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Current difficulty parameters. Derived, never stored as history.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Difficulty {
    /// Multiplies every obstacle's descent speed
    pub speed_multiplier: f32,
    /// Chance of a spawn attempt succeeding on a given tick
    pub spawn_probability: f32,
    /// Discretized level shown to the player (1-based)
    pub level: u32,
}

impl Difficulty {
    /// Evaluate the difficulty curves for a cumulative score.
    ///
    /// Each parameter is monotonic non-decreasing in score and clamped to
    /// its configured maximum.
    pub fn for_score(score: u64, tuning: &Tuning) -> Self {
        let speed_multiplier = (tuning.base_speed_multiplier
            + score as f32 / tuning.speed_multiplier_divisor)
            .min(tuning.max_speed_multiplier);
        let spawn_probability = (tuning.base_spawn_probability
            + score as f32 / tuning.spawn_probability_divisor)
            .min(tuning.max_spawn_probability);
        let level = (score / tuning.level_step + 1).min(tuning.max_level as u64) as u32;

        Self {
            speed_multiplier,
            spawn_probability,
            level,
        }
    }
}
