//! Player movement state machine
//!
//! The player occupies a grid cell and hops between adjacent cells with an
//! eased, time-bounded transition. Only one transition can be in flight;
//! completion snaps the pixel position exactly onto the target cell so no
//! interpolation drift accumulates.

use glam::Vec2;

use crate::{cell_center, ease_out_cubic, hop_arc};

/// Movement state: idle on a cell, or interpolating toward one
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoveState {
    Idle,
    Moving {
        /// Pixel position the hop started from (may be off-grid after a ride)
        from: Vec2,
        target_column: u32,
        target_row: u32,
        elapsed: f32,
        duration: f32,
    },
}

/// The player token
#[derive(Debug, Clone)]
pub struct Player {
    /// Logical grid cell; column stays in [0, COLUMN_COUNT)
    pub column: u32,
    pub row: u32,
    /// Continuous pixel position
    pub pos: Vec2,
    /// Vertical hop offset for rendering, zero while idle
    pub hop_offset: f32,
    /// Selected skin index (render-only)
    pub skin: usize,
    pub state: MoveState,
    /// Direction of the last accepted hop, for slippery-row slides
    pub(crate) last_step: (i8, i8),
}

impl Player {
    pub fn new(column: u32, row: u32, skin: usize) -> Self {
        Self {
            column,
            row,
            pos: cell_center(column, row),
            hop_offset: 0.0,
            skin,
            state: MoveState::Idle,
            last_step: (0, 0),
        }
    }

    pub fn is_moving(&self) -> bool {
        matches!(self.state, MoveState::Moving { .. })
    }

    /// Begin a hop toward an already validated target cell
    pub(crate) fn begin_move(&mut self, target_column: u32, target_row: u32, duration: f32) {
        debug_assert!(!self.is_moving());
        self.state = MoveState::Moving {
            from: self.pos,
            target_column,
            target_row,
            elapsed: 0.0,
            duration,
        };
    }

    /// Advance an in-flight transition. Returns true on the completing tick.
    pub fn update(&mut self, dt: f32) -> bool {
        let MoveState::Moving {
            from,
            target_column,
            target_row,
            elapsed,
            duration,
        } = &mut self.state
        else {
            return false;
        };

        *elapsed += dt;
        let t = (*elapsed / *duration).min(1.0);
        let k = ease_out_cubic(t);
        let target = cell_center(*target_column, *target_row);
        self.pos = *from + (target - *from) * k;
        self.hop_offset = hop_arc(t);

        if t >= 1.0 {
            // Snap exactly onto the cell
            self.column = *target_column;
            self.row = *target_row;
            self.pos = target;
            self.hop_offset = 0.0;
            self.state = MoveState::Idle;
            return true;
        }
        false
    }

    /// Sideways carry while standing on a floating platform
    pub(crate) fn carry(&mut self, dx: f32) {
        debug_assert!(!self.is_moving());
        self.pos.x += dx;
        self.column = crate::column_at(self.pos.x);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{HOP_DURATION, HOP_HEIGHT, SIM_DT};

    fn run_to_completion(player: &mut Player) -> u32 {
        let mut ticks = 0;
        while player.is_moving() {
            player.update(SIM_DT);
            ticks += 1;
            assert!(ticks < 1000, "transition never completed");
        }
        ticks
    }

    #[test]
    fn test_completion_snaps_to_cell_center() {
        let mut player = Player::new(4, 2, 0);
        // Start from a slightly drifted position, as after a log ride
        player.pos.x += 13.7;
        player.begin_move(5, 2, HOP_DURATION);
        run_to_completion(&mut player);

        assert_eq!(player.state, MoveState::Idle);
        assert_eq!(player.column, 5);
        assert_eq!(player.row, 2);
        assert_eq!(player.pos, cell_center(5, 2));
        assert_eq!(player.hop_offset, 0.0);
    }

    #[test]
    fn test_hop_rises_and_lands() {
        let mut player = Player::new(4, 2, 0);
        player.begin_move(4, 3, HOP_DURATION);

        let mut peak: f32 = 0.0;
        while player.is_moving() {
            player.update(SIM_DT);
            peak = peak.max(player.hop_offset);
        }
        assert!(peak > HOP_HEIGHT * 0.8);
        assert_eq!(player.hop_offset, 0.0);
    }

    #[test]
    fn test_transition_duration_is_bounded() {
        let mut player = Player::new(0, 0, 0);
        player.begin_move(1, 0, HOP_DURATION);
        let ticks = run_to_completion(&mut player);
        let expected = (HOP_DURATION / SIM_DT).ceil() as u32;
        assert!(ticks <= expected + 1);
    }

    #[test]
    fn test_carry_re_derives_column() {
        let mut player = Player::new(4, 2, 0);
        player.carry(crate::consts::CELL_SIZE * 1.2);
        assert_eq!(player.column, 5);
    }
}
