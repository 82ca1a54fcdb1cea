//! Lane Hopper - an endless lane-crossing arcade game core
//!
//! Core modules:
//! - `sim`: Fixed-timestep simulation (lane generation, obstacle pool,
//!   player movement, interaction resolution)
//! - `profile`: Best-score / coin / skin persistence
//!
//! Rendering, audio and raw input devices live outside this crate; the sim
//! exposes a read-only frame view and a fire-and-forget event queue for
//! them.

pub mod profile;
pub mod sim;

pub use profile::Profile;
pub use sim::{GameEvent, GamePhase, GameState, TickInput, tick};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum frame delta fed into the sim; stall time beyond it is dropped
    pub const MAX_FRAME_DT: f32 = 0.032;

    /// Playfield grid
    pub const COLUMN_COUNT: u32 = 9;
    pub const CELL_SIZE: f32 = 80.0;
    pub const PLAY_WIDTH: f32 = COLUMN_COUNT as f32 * CELL_SIZE;

    /// Rows kept ahead of the scroll line, and behind it before eviction
    pub const VISIBLE_ROWS: u32 = 14;
    pub const ROWS_BEHIND: u32 = 3;
    /// Leading rows of a fresh run are plain grass
    pub const SAFE_APRON_ROWS: u32 = 4;

    /// Hop transition
    pub const HOP_DURATION: f32 = 0.18;
    pub const HOP_HEIGHT: f32 = 24.0;
    /// Hop duration multiplier when starting from a slow (mud) row
    pub const SLOW_HOP_FACTOR: f32 = 1.6;
    /// Fraction of the hop after which the world scroll fires
    pub const WORLD_SHIFT_FRACTION: f32 = 0.5;

    /// Player hitbox inset from the full cell (forgiving margins)
    pub const PLAYER_INSET: f32 = 14.0;

    /// Obstacles are recycled this far past the playfield edge
    pub const OFFSCREEN_MARGIN: f32 = 160.0;
    /// Trains spawn this far out to give warning time
    pub const RAIL_SPAWN_LEAD: f32 = 620.0;
    /// Camera catch-up rate (per second)
    pub const CAMERA_LERP: f32 = 6.0;

    /// Difficulty ramp
    pub const BASE_SAFE_PROB: f32 = 0.60;
    pub const MIN_SAFE_PROB: f32 = 0.18;
    pub const SAFE_PROB_DECAY: f32 = 0.002;
    pub const SPECIAL_WEIGHT: f32 = 0.015;
    pub const SPECIAL_RAMP: f32 = 0.01;
    pub const BASE_LANE_SPEED: f32 = 90.0;
    pub const LANE_SPEED_RAMP: f32 = 0.6;
    pub const MAX_LANE_SPEED: f32 = 260.0;

    /// Row decoration
    pub const COIN_PROB: f32 = 0.12;
    pub const DEBRIS_PROB: f32 = 0.30;

    /// Obstacle pool size hint (grows on demand)
    pub const POOL_CAPACITY: usize = 64;

    /// Obstacle dimensions (px)
    pub const VEHICLE_WIDTH: f32 = 72.0;
    pub const VEHICLE_HEIGHT: f32 = 44.0;
    pub const LOG_MIN_WIDTH: f32 = 120.0;
    pub const LOG_MAX_WIDTH: f32 = 200.0;
    pub const LOG_HEIGHT: f32 = 48.0;
    pub const TRAIN_WIDTH: f32 = 320.0;
    pub const TRAIN_HEIGHT: f32 = 52.0;
    pub const DEBRIS_SIZE: f32 = 40.0;
}

/// Ease-out cubic, maps [0, 1] to [0, 1]
#[inline]
pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Vertical hop arc offset at normalized progress `t`
#[inline]
pub fn hop_arc(t: f32) -> f32 {
    (t * std::f32::consts::PI).sin() * consts::HOP_HEIGHT
}

/// Pixel x of a grid column's center
#[inline]
pub fn cell_center_x(column: u32) -> f32 {
    (column as f32 + 0.5) * consts::CELL_SIZE
}

/// World y of a row's center band
#[inline]
pub fn row_y(index: u32) -> f32 {
    index as f32 * consts::CELL_SIZE
}

/// Pixel center of a grid cell
#[inline]
pub fn cell_center(column: u32, row: u32) -> Vec2 {
    Vec2::new(cell_center_x(column), row_y(row))
}

/// Nearest grid column for a pixel x, clamped into the playfield
#[inline]
pub fn column_at(x: f32) -> u32 {
    let col = (x / consts::CELL_SIZE).floor();
    (col.max(0.0) as u32).min(consts::COLUMN_COUNT - 1)
}
