//! Fixed-cadence game loop
//!
//! One `tick(state, input, dt)` per rendered frame, dt clamped to bound
//! simulation error during stalls. All mutable state is owned by the call
//! chain; the only deferred work is the world-shift queue, which is keyed
//! to simulation ticks so pausing suspends it for free.

use super::interact;
use super::lanes;
use super::state::{GameEvent, GamePhase, GameState, RowKind};
use crate::consts::*;

/// Input intents for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Directional move intent; components in {-1, 0, 1}, one axis only
    pub step: Option<(i8, i8)>,
    /// Pause/resume toggle
    pub pause: bool,
    /// Tear down and start a new run
    pub restart: bool,
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.restart {
        state.restart();
        return;
    }

    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                state.pause();
                return;
            }
            GamePhase::Paused => state.resume(),
            _ => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }

    let dt = dt.clamp(0.0, MAX_FRAME_DT);
    state.time_ticks += 1;

    // Deferred world shifts first, so new row geometry is in place before
    // the hop that scheduled them lands
    process_shifts(state);

    if let Some((dx, dy)) = input.step {
        try_move(state, dx, dy);
    }

    if state.player.update(dt) {
        on_move_complete(state);
    }

    advance_obstacles(state, dt);

    let target = state.scroll_row as f32 * CELL_SIZE;
    state.camera_y += (target - state.camera_y) * (dt * CAMERA_LERP).min(1.0);

    interact::resolve(state, dt);
}

/// Validate and accept a directional intent. Invalid requests are silent
/// no-ops: wrong shape, mid-transition, out of bounds, or a debris-blocked
/// target cell.
fn try_move(state: &mut GameState, dx: i8, dy: i8) -> bool {
    let one_axis = (dx == 0) != (dy == 0);
    if !one_axis || dx.abs() > 1 || dy.abs() > 1 {
        return false;
    }
    if state.player.is_moving() {
        return false;
    }

    let column = state.player.column as i64 + dx as i64;
    let row = state.player.row as i64 + dy as i64;
    if column < 0 || column >= COLUMN_COUNT as i64 {
        return false;
    }
    if row < state.first_row_index() as i64 || row > state.last_row_index() as i64 {
        return false;
    }
    let (column, row) = (column as u32, row as u32);

    if let Some(target) = state.row(row) {
        if lanes::debris_at(target, &state.pool, column) {
            return false;
        }
    }

    // Mud stretches the hop leaving it
    let slow = state
        .row(state.player.row)
        .map(|r| r.kind == RowKind::Slow)
        .unwrap_or(false);
    let duration = if slow { HOP_DURATION * SLOW_HOP_FACTOR } else { HOP_DURATION };

    state.player.last_step = (dx, dy);
    state.player.begin_move(column, row, duration);
    state.events.push(GameEvent::Hop);

    if dy > 0 {
        // Score counts on acceptance, not on landing
        state.distance += 1;
        let lead = ((duration * WORLD_SHIFT_FRACTION) / SIM_DT).ceil() as u64;
        state.pending_shifts.push_back(state.time_ticks + lead.max(1));
    }
    true
}

/// Landing hook: ice re-issues the hop once in the same direction
fn on_move_complete(state: &mut GameState) {
    let (dx, dy) = state.player.last_step;
    let slippery = state
        .row(state.player.row)
        .map(|r| r.kind == RowKind::Slippery)
        .unwrap_or(false);
    if slippery && (dx, dy) != (0, 0) && try_move(state, dx, dy) {
        log::debug!("slid on ice at row {}", state.player.row);
    }
}

/// Pop every due world shift: advance the scroll line, evict rows that
/// fell behind it, and top the window back up
fn process_shifts(state: &mut GameState) {
    while state
        .pending_shifts
        .front()
        .is_some_and(|&due| due <= state.time_ticks)
    {
        state.pending_shifts.pop_front();
        state.scroll_row += 1;

        // Never evict a row the player still occupies or is hopping toward
        let anchor = match state.player.state {
            super::player::MoveState::Moving { target_row, .. } => {
                state.player.row.min(target_row)
            }
            _ => state.player.row,
        };
        let keep_from = state.scroll_row.saturating_sub(ROWS_BEHIND).min(anchor);
        while state.first_row_index() < keep_from {
            state.evict_front_row();
        }
        state.fill_row_window();
    }
}

/// Integrate obstacle motion and recycle anything that left the margin in
/// its direction of travel; moving lanes get a replacement from the entry
/// edge so a camped row never drains empty.
fn advance_obstacles(state: &mut GameState, dt: f32) {
    let GameState { rows, pool, .. } = state;
    for row in rows.iter_mut() {
        let mut i = 0;
        while i < row.obstacles.len() {
            let id = row.obstacles[i];
            let ob = pool.get_mut(id);
            if ob.vel_x == 0.0 {
                i += 1;
                continue;
            }
            ob.pos.x += ob.vel_x * dt;

            let gone = (ob.vel_x > 0.0 && ob.left() > PLAY_WIDTH + OFFSCREEN_MARGIN)
                || (ob.vel_x < 0.0 && ob.right() < -OFFSCREEN_MARGIN);
            if gone {
                let (kind, size, vel_x) = (ob.kind, ob.size, ob.vel_x);
                row.obstacles.swap_remove(i);
                pool.release(id);
                lanes::respawn_traffic(row, pool, kind, size, vel_x);
            } else {
                i += 1;
            }
        }
    }
}
