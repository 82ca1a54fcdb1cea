//! Difficulty ramps
//!
//! Pure functions of cumulative distance. Distance doubles as the score,
//! so these are the only knobs tying progress to pressure: safe rows get
//! rarer, special rows get likelier, lanes get faster.

use rand::Rng;

use crate::consts::*;

/// Probability that the next row is a safe kind (grass/sidewalk).
///
/// Decreases linearly with distance down to a floor; constant afterwards.
pub fn safe_row_probability(distance: f32) -> f32 {
    (BASE_SAFE_PROB - distance * SAFE_PROB_DECAY).clamp(MIN_SAFE_PROB, BASE_SAFE_PROB)
}

/// Multiplier applied to the rare slow/slippery row weights
pub fn special_row_ramp(distance: f32) -> f32 {
    1.0 + distance * SPECIAL_RAMP
}

/// Base obstacle speed for a newly spawned row.
///
/// Evaluated once at row spawn and never re-rolled mid-row; the random
/// factor keeps neighboring lanes from moving in lockstep.
pub fn lane_speed<R: Rng>(distance: f32, rng: &mut R) -> f32 {
    let ramped = BASE_LANE_SPEED + distance * LANE_SPEED_RAMP;
    (ramped * rng.random_range(1.0..1.5)).min(MAX_LANE_SPEED)
}
