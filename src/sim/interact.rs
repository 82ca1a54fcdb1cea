//! Per-tick interaction resolution
//!
//! Runs once per tick after movement integration. The player's row is
//! found by direct index lookup; outcomes are resolved in a fixed order:
//! coin pickup, then vehicle collision, then river buoyancy. At most one
//! outcome ends the run per tick.

use glam::Vec2;

use super::collision::{Aabb, span_contains};
use super::pool::ObstacleKind;
use super::state::{GameEvent, GamePhase, GameState, RunEnd, RowKind};
use crate::consts::*;

/// Player hitbox, inset from the full cell for forgiving margins
fn player_box(pos: Vec2) -> Aabb {
    let side = CELL_SIZE - 2.0 * PLAYER_INSET;
    Aabb::from_center_size(pos, Vec2::splat(side))
}

pub(crate) fn resolve(state: &mut GameState, dt: f32) {
    if state.phase != GamePhase::Playing {
        return;
    }

    let first = state.first_row_index();
    let GameState {
        rows,
        pool,
        player,
        coins,
        events,
        ..
    } = state;

    let Some(row) = player
        .row
        .checked_sub(first)
        .and_then(|off| rows.get_mut(off as usize))
    else {
        // The move validator keeps the player inside the window
        return;
    };

    // 1. Coin pickup
    if let Some(coin) = &mut row.coin {
        if !coin.collected && coin.column == player.column {
            coin.collected = true;
            *coins += 1;
            events.push(GameEvent::CoinCollected {
                row: row.index,
                column: coin.column,
            });
            log::debug!("coin collected at row {}, column {}", row.index, coin.column);
        }
    }

    // 2/3. Hazards
    let fatal = match row.kind {
        RowKind::Road | RowKind::Rail => {
            let hitbox = player_box(player.pos);
            let hit = row.obstacles.iter().any(|&id| {
                let ob = pool.get(id);
                ob.active
                    && ob.kind != ObstacleKind::Debris
                    && hitbox.overlaps(&Aabb::from_center_size(ob.pos, ob.size))
            });
            hit.then_some(RunEnd::Crash)
        }
        RowKind::River => {
            if player.is_moving() {
                // Mid-hop players are not water-checked; the landing tick
                // decides
                None
            } else {
                let ride = row.obstacles.iter().find_map(|&id| {
                    let ob = pool.get(id);
                    (ob.active
                        && ob.kind == ObstacleKind::Log
                        && span_contains(ob.pos.x, ob.size.x, player.pos.x))
                    .then_some(ob.vel_x)
                });
                match ride {
                    Some(vel_x) => {
                        // Same dt the logs integrate with, so the rider
                        // never drifts relative to its platform
                        player.carry(vel_x * dt);
                        // Carried past the playfield edge is still a drowning
                        (player.pos.x < 0.0 || player.pos.x > PLAY_WIDTH)
                            .then_some(RunEnd::Drown)
                    }
                    None => Some(RunEnd::Drown),
                }
            }
        }
        _ => None,
    };

    if let Some(cause) = fatal {
        state.end_run(cause);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell_center_x;
    use crate::sim::player::MoveState;
    use crate::sim::pool::ObstacleId;
    use crate::sim::state::Coin;

    /// A running state with every row flattened to bare grass
    fn blank_state() -> GameState {
        let mut state = GameState::with_seed(7, 0);
        state.start();
        let ids: Vec<ObstacleId> = state
            .rows
            .iter_mut()
            .flat_map(|row| {
                row.kind = RowKind::Grass;
                row.coin = None;
                row.obstacles.drain(..).collect::<Vec<_>>()
            })
            .collect();
        for id in ids {
            state.pool.release(id);
        }
        state
    }

    fn add_obstacle(
        state: &mut GameState,
        row_index: u32,
        kind: ObstacleKind,
        x: f32,
        width: f32,
        vel_x: f32,
    ) {
        let y = crate::row_y(row_index);
        let id = state.pool.acquire();
        let ob = state.pool.get_mut(id);
        ob.kind = kind;
        ob.row = row_index;
        ob.pos = Vec2::new(x, y);
        ob.size = Vec2::new(width, 44.0);
        ob.vel_x = vel_x;
        state.row_mut(row_index).unwrap().obstacles.push(id);
    }

    #[test]
    fn test_coin_collected_exactly_once() {
        let mut state = blank_state();
        let row = state.player.row;
        let column = state.player.column;
        state.row_mut(row).unwrap().coin = Some(Coin { column, collected: false });

        resolve(&mut state, SIM_DT);
        resolve(&mut state, SIM_DT);
        resolve(&mut state, SIM_DT);

        assert_eq!(state.coins, 1);
        let pickups = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::CoinCollected { .. }))
            .count();
        assert_eq!(pickups, 1);
    }

    #[test]
    fn test_coin_at_other_column_is_left_alone() {
        let mut state = blank_state();
        let row = state.player.row;
        let column = state.player.column + 1;
        state.row_mut(row).unwrap().coin = Some(Coin { column, collected: false });

        resolve(&mut state, SIM_DT);
        assert_eq!(state.coins, 0);
        assert!(!state.row(row).unwrap().coin.unwrap().collected);
    }

    #[test]
    fn test_vehicle_overlap_ends_run() {
        let mut state = blank_state();
        let row = state.player.row;
        state.row_mut(row).unwrap().kind = RowKind::Road;
        let px = state.player.pos.x;
        add_obstacle(&mut state, row, ObstacleKind::Vehicle, px, 72.0, 120.0);

        resolve(&mut state, SIM_DT);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.drain_events().contains(&GameEvent::Crash));
    }

    #[test]
    fn test_distant_vehicle_is_harmless() {
        let mut state = blank_state();
        let row = state.player.row;
        state.row_mut(row).unwrap().kind = RowKind::Road;
        let far_x = state.player.pos.x + 200.0;
        add_obstacle(&mut state, row, ObstacleKind::Vehicle, far_x, 72.0, 120.0);

        resolve(&mut state, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_log_carries_player() {
        let mut state = blank_state();
        let row = state.player.row;
        state.row_mut(row).unwrap().kind = RowKind::River;
        let px = state.player.pos.x;
        add_obstacle(&mut state, row, ObstacleKind::Log, px, 160.0, 60.0);

        let x0 = state.player.pos.x;
        resolve(&mut state, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
        assert!((state.player.pos.x - (x0 + 60.0 * SIM_DT)).abs() < 1e-4);

        resolve(&mut state, SIM_DT);
        assert!((state.player.pos.x - (x0 + 2.0 * 60.0 * SIM_DT)).abs() < 1e-4);
    }

    #[test]
    fn test_log_carry_scales_with_frame_dt() {
        let mut state = blank_state();
        let row = state.player.row;
        state.row_mut(row).unwrap().kind = RowKind::River;
        let px = state.player.pos.x;
        add_obstacle(&mut state, row, ObstacleKind::Log, px, 160.0, 60.0);

        // A short frame carries proportionally less, matching the distance
        // the log itself moved that frame
        let x0 = state.player.pos.x;
        resolve(&mut state, SIM_DT / 2.0);
        assert!((state.player.pos.x - (x0 + 60.0 * SIM_DT / 2.0)).abs() < 1e-4);
    }

    #[test]
    fn test_open_water_drowns_idle_player() {
        let mut state = blank_state();
        let row = state.player.row;
        state.row_mut(row).unwrap().kind = RowKind::River;

        resolve(&mut state, SIM_DT);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.drain_events().contains(&GameEvent::Splash));
    }

    #[test]
    fn test_mid_hop_over_water_is_not_drowned() {
        let mut state = blank_state();
        let row = state.player.row;
        state.row_mut(row).unwrap().kind = RowKind::River;
        state.player.state = MoveState::Moving {
            from: state.player.pos,
            target_column: state.player.column,
            target_row: row + 1,
            elapsed: 0.05,
            duration: HOP_DURATION,
        };

        resolve(&mut state, SIM_DT);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_carried_off_the_edge_drowns() {
        let mut state = blank_state();
        let row = state.player.row;
        state.row_mut(row).unwrap().kind = RowKind::River;
        state.player.pos.x = PLAY_WIDTH - 0.5;
        add_obstacle(&mut state, row, ObstacleKind::Log, PLAY_WIDTH - 20.0, 200.0, 120.0);

        resolve(&mut state, SIM_DT);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(state.drain_events().contains(&GameEvent::Splash));
    }

    #[test]
    fn test_coin_and_fatal_hazard_in_same_tick() {
        let mut state = blank_state();
        let row = state.player.row;
        let column = state.player.column;
        {
            let r = state.row_mut(row).unwrap();
            r.kind = RowKind::Road;
            r.coin = Some(Coin { column, collected: false });
        }
        add_obstacle(&mut state, row, ObstacleKind::Vehicle, cell_center_x(column), 72.0, 0.0);

        resolve(&mut state, SIM_DT);

        // Coin resolves before the hazard check terminates the run
        assert_eq!(state.coins, 1);
        assert_eq!(state.phase, GamePhase::GameOver);
    }
}
