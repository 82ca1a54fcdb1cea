//! Game state and core simulation types
//!
//! Everything a run mutates lives here: the row window, the obstacle pool,
//! the player and the outbound event queue. State is owned by the caller
//! and threaded into the tick by `&mut` - no globals.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::lanes;
use super::player::Player;
use super::pool::{Obstacle, ObstacleId, ObstaclePool};
use crate::consts::*;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Constructed, waiting for `start()`
    Ready,
    /// Active gameplay
    Playing,
    /// Tick invocation suspended
    Paused,
    /// Run ended (crash or drowning)
    GameOver,
}

/// Lane type of a row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKind {
    Grass,
    Sidewalk,
    Road,
    River,
    Rail,
    /// Mud: hops started here take longer
    Slow,
    /// Ice: landing here repeats the hop once in the same direction
    Slippery,
}

impl RowKind {
    /// Rows whose obstacles kill on contact
    pub fn is_vehicular(self) -> bool {
        matches!(self, RowKind::Road | RowKind::Rail)
    }

    /// Rows with no lethal hazard of their own
    pub fn is_safe(self) -> bool {
        matches!(
            self,
            RowKind::Grass | RowKind::Sidewalk | RowKind::Slow | RowKind::Slippery
        )
    }
}

/// Per-row coin descriptor
#[derive(Debug, Clone, Copy)]
pub struct Coin {
    pub column: u32,
    pub collected: bool,
}

/// One horizontal strip of the world
#[derive(Debug, Clone)]
pub struct Row {
    /// Sequential index; strictly increasing and contiguous in the window
    pub index: u32,
    /// Vertical world offset of the row's center band
    pub y: f32,
    pub kind: RowKind,
    /// Obstacle speed fixed at spawn time
    pub speed: f32,
    /// Obstacles exclusively owned by this row
    pub obstacles: Vec<ObstacleId>,
    pub coin: Option<Coin>,
}

/// Fire-and-forget notifications for external audio/particle/persistence
/// collaborators. The core never waits on their handling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// A hop was accepted
    Hop,
    CoinCollected { row: u32, column: u32 },
    /// Run ended by vehicle contact
    Crash,
    /// Run ended in the water
    Splash,
    /// Terminal report for the persistence boundary
    RunEnded { distance: u64, coins: u64 },
}

/// Cause of a run ending; normal outcomes, not errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunEnd {
    Crash,
    Drown,
}

/// Complete game state for one run
#[derive(Debug)]
pub struct GameState {
    pub seed: u64,
    pub rng: Pcg32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Cumulative forward progress; doubles as the score
    pub distance: u64,
    /// Coins collected this run
    pub coins: u64,
    pub player: Player,
    /// Live row window, front = lowest index
    pub rows: VecDeque<Row>,
    pub pool: ObstaclePool,
    /// Rows the world has scrolled past; drives camera and eviction
    pub scroll_row: u32,
    /// Smoothed camera offset toward `scroll_row * CELL_SIZE`
    pub camera_y: f32,
    /// Tick-counted world-shift queue (due ticks, monotone)
    pub(crate) pending_shifts: VecDeque<u64>,
    pub(crate) events: Vec<GameEvent>,
}

impl GameState {
    /// Create a fresh run with an entropy seed
    pub fn new(skin: usize) -> Self {
        Self::with_seed(rand::rng().random(), skin)
    }

    /// Create a fresh run with a fixed seed (tests)
    pub fn with_seed(seed: u64, skin: usize) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Ready,
            time_ticks: 0,
            distance: 0,
            coins: 0,
            player: Player::new(COLUMN_COUNT / 2, 1, skin),
            rows: VecDeque::new(),
            pool: ObstaclePool::new(POOL_CAPACITY),
            scroll_row: 0,
            camera_y: 0.0,
            pending_shifts: VecDeque::new(),
            events: Vec::new(),
        };
        state.fill_row_window();
        state
    }

    /// Spawn rows until the window extends `VISIBLE_ROWS` past the scroll line
    pub(crate) fn fill_row_window(&mut self) {
        while self
            .rows
            .back()
            .map(|r| r.index < self.scroll_row + VISIBLE_ROWS)
            .unwrap_or(true)
        {
            lanes::spawn_row(self);
        }
    }

    /// Lowest row index still in the window
    pub fn first_row_index(&self) -> u32 {
        self.rows.front().map(|r| r.index).unwrap_or(0)
    }

    /// Highest row index in the window
    pub fn last_row_index(&self) -> u32 {
        self.rows.back().map(|r| r.index).unwrap_or(0)
    }

    pub fn row(&self, index: u32) -> Option<&Row> {
        let first = self.first_row_index();
        index
            .checked_sub(first)
            .and_then(|off| self.rows.get(off as usize))
    }

    pub fn row_mut(&mut self, index: u32) -> Option<&mut Row> {
        let first = self.first_row_index();
        index
            .checked_sub(first)
            .and_then(|off| self.rows.get_mut(off as usize))
    }

    /// Drop the front row, returning its obstacles to the pool
    pub(crate) fn evict_front_row(&mut self) {
        if let Some(row) = self.rows.pop_front() {
            for id in row.obstacles {
                self.pool.release(id);
            }
        }
    }

    // === Lifecycle commands ===

    pub fn start(&mut self) {
        if self.phase == GamePhase::Ready {
            self.phase = GamePhase::Playing;
            log::info!("run started (seed {})", self.seed);
        }
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Playing {
            self.phase = GamePhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Playing;
        }
    }

    /// Tear the run down and rebuild, reusing the pool arena.
    ///
    /// Every live obstacle is drained back to the pool before the row
    /// window is rebuilt, so no slot leaks across runs.
    pub fn restart(&mut self) {
        while !self.rows.is_empty() {
            self.evict_front_row();
        }
        assert_eq!(self.pool.active_count(), 0, "restart leaked pooled obstacles");

        self.seed = rand::rng().random();
        self.rng = Pcg32::seed_from_u64(self.seed);
        self.time_ticks = 0;
        self.distance = 0;
        self.coins = 0;
        self.player = Player::new(COLUMN_COUNT / 2, 1, self.player.skin);
        self.scroll_row = 0;
        self.camera_y = 0.0;
        self.pending_shifts.clear();
        self.events.clear();
        self.fill_row_window();
        self.phase = GamePhase::Playing;
        log::info!("run restarted (seed {})", self.seed);
    }

    /// Terminal game outcome; at most one per run
    pub(crate) fn end_run(&mut self, cause: RunEnd) {
        if self.phase != GamePhase::Playing {
            return;
        }
        self.phase = GamePhase::GameOver;
        self.events.push(match cause {
            RunEnd::Crash => GameEvent::Crash,
            RunEnd::Drown => GameEvent::Splash,
        });
        self.events.push(GameEvent::RunEnded {
            distance: self.distance,
            coins: self.coins,
        });
        log::info!(
            "run over ({:?}): distance {}, coins {}",
            cause,
            self.distance,
            self.coins
        );
    }

    // === External interfaces ===

    /// Take the queued notifications; the shell reacts, the core moves on
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only view for an external renderer
    pub fn frame(&self) -> FrameView<'_> {
        FrameView { state: self }
    }
}

/// Borrowed, read-only snapshot of everything a renderer needs
#[derive(Clone, Copy)]
pub struct FrameView<'a> {
    state: &'a GameState,
}

impl<'a> FrameView<'a> {
    pub fn camera_y(&self) -> f32 {
        self.state.camera_y
    }

    pub fn rows(&self) -> impl Iterator<Item = &'a Row> {
        self.state.rows.iter()
    }

    /// Active obstacles of one row, in ownership order
    pub fn row_obstacles(&self, row: &Row) -> impl Iterator<Item = &'a Obstacle> {
        let state = self.state;
        row.obstacles.iter().map(move |&id| state.pool.get(id))
    }

    pub fn obstacle(&self, id: ObstacleId) -> &'a Obstacle {
        self.state.pool.get(id)
    }

    pub fn player(&self) -> &'a Player {
        &self.state.player
    }

    pub fn distance(&self) -> u64 {
        self.state.distance
    }

    pub fn coins(&self) -> u64 {
        self.state.coins
    }
}
