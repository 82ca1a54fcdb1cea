//! Procedural lane generation
//!
//! Rows are spawned on demand at the top of the window: a weighted draw
//! picks the lane kind, the difficulty ramp fixes the row's speed, and the
//! row is populated with obstacles drawn from the pool. Candidate order in
//! the weight table is fixed; it doubles as the tie-break for equal
//! weights.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::difficulty;
use super::pool::{ObstacleKind, ObstaclePool};
use super::state::{Coin, GameState, Row, RowKind};
use crate::consts::*;
use crate::{cell_center_x, column_at, row_y};

/// Lane-kind weights at a given distance, in fixed candidate order
pub(crate) fn lane_weights(distance: f32) -> [(RowKind, f32); 7] {
    let safe = difficulty::safe_row_probability(distance);
    let hazard = 1.0 - safe;
    let special = SPECIAL_WEIGHT * difficulty::special_row_ramp(distance);
    [
        (RowKind::Grass, safe * 0.7),
        (RowKind::Sidewalk, safe * 0.3),
        (RowKind::Road, hazard * 0.45),
        (RowKind::River, hazard * 0.35),
        (RowKind::Rail, hazard * 0.20),
        (RowKind::Slippery, special),
        (RowKind::Slow, special),
    ]
}

/// Weighted choice: uniform draw in [0, total), walk candidates until the
/// cumulative weight exceeds the draw. First match wins.
pub(crate) fn weighted_pick<R: Rng>(rng: &mut R, weights: &[(RowKind, f32)]) -> RowKind {
    let total: f32 = weights.iter().map(|(_, w)| w).sum();
    let draw = rng.random_range(0.0..total);
    let mut acc = 0.0;
    for &(kind, w) in weights {
        acc += w;
        if draw < acc {
            return kind;
        }
    }
    // Float accumulation can leave the draw a hair past the last bucket
    weights[weights.len() - 1].0
}

/// Spawn the next row at the back of the window
pub(crate) fn spawn_row(state: &mut GameState) {
    let index = state.rows.back().map(|r| r.index + 1).unwrap_or(0);
    let distance = state.distance as f32;
    let GameState { rng, pool, rows, .. } = state;

    // The opening stretch is always plain grass
    let apron = index < SAFE_APRON_ROWS;
    let kind = if apron {
        RowKind::Grass
    } else {
        weighted_pick(rng, &lane_weights(distance))
    };

    let mut row = Row {
        index,
        y: row_y(index),
        kind,
        speed: difficulty::lane_speed(distance, rng),
        obstacles: Vec::new(),
        coin: None,
    };

    if !apron {
        populate_row(&mut row, pool, rng);

        // Coin roll is independent of the lane kind
        if rng.random_bool(COIN_PROB as f64) {
            let mut column = rng.random_range(0..COLUMN_COUNT);
            let mut attempts = 0;
            while debris_at(&row, pool, column) && attempts < 8 {
                column = rng.random_range(0..COLUMN_COUNT);
                attempts += 1;
            }
            if !debris_at(&row, pool, column) {
                row.coin = Some(Coin { column, collected: false });
            }
        }
    }

    log::debug!("row {} spawned: {:?}, speed {:.0}", index, row.kind, row.speed);
    rows.push_back(row);
}

/// Fill a freshly spawned row with obstacles drawn from the pool
fn populate_row(row: &mut Row, pool: &mut ObstaclePool, rng: &mut Pcg32) {
    let dir: f32 = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
    match row.kind {
        RowKind::Road => {
            let count = rng.random_range(2..=4);
            let factor: f32 = rng.random_range(0.9..1.6);
            let vel = row.speed * factor * dir;
            let spacing = (PLAY_WIDTH + 2.0 * OFFSCREEN_MARGIN) / count as f32;
            let entry = entry_edge(dir, OFFSCREEN_MARGIN);
            for i in 0..count {
                let stagger = i as f32 * spacing * rng.random_range(0.9..1.3);
                let x = entry - dir * stagger;
                push_obstacle(
                    row,
                    pool,
                    ObstacleKind::Vehicle,
                    Vec2::new(x, row.y),
                    Vec2::new(VEHICLE_WIDTH, VEHICLE_HEIGHT),
                    vel,
                );
            }
        }
        RowKind::River => {
            let count = rng.random_range(2..=4);
            let factor: f32 = rng.random_range(0.5..1.1);
            let vel = row.speed * factor * dir;
            // Logs start on screen so the river is rideable on arrival
            let slot = PLAY_WIDTH / count as f32;
            for i in 0..count {
                let x = (i as f32 + rng.random_range(0.1..0.6)) * slot;
                let width = rng.random_range(LOG_MIN_WIDTH..LOG_MAX_WIDTH);
                push_obstacle(
                    row,
                    pool,
                    ObstacleKind::Log,
                    Vec2::new(x, row.y),
                    Vec2::new(width, LOG_HEIGHT),
                    vel,
                );
            }
        }
        RowKind::Rail => {
            let factor: f32 = rng.random_range(1.2..1.8);
            let vel = row.speed * factor * dir;
            let x = entry_edge(dir, RAIL_SPAWN_LEAD);
            push_obstacle(
                row,
                pool,
                ObstacleKind::Train,
                Vec2::new(x, row.y),
                Vec2::new(TRAIN_WIDTH, TRAIN_HEIGHT),
                vel,
            );
        }
        RowKind::Grass | RowKind::Sidewalk | RowKind::Slow | RowKind::Slippery => {
            if rng.random_bool(DEBRIS_PROB as f64) {
                let column = rng.random_range(0..COLUMN_COUNT);
                push_obstacle(
                    row,
                    pool,
                    ObstacleKind::Debris,
                    Vec2::new(cell_center_x(column), row.y),
                    Vec2::new(DEBRIS_SIZE, DEBRIS_SIZE),
                    0.0,
                );
            }
        }
    }
}

/// Replacement for an obstacle that was recycled off-screen: same traffic,
/// re-entering from the spawn edge
pub(crate) fn respawn_traffic(
    row: &mut Row,
    pool: &mut ObstaclePool,
    kind: ObstacleKind,
    size: Vec2,
    vel_x: f32,
) {
    let dir = vel_x.signum();
    let lead = match kind {
        ObstacleKind::Train => RAIL_SPAWN_LEAD,
        _ => OFFSCREEN_MARGIN,
    };
    push_obstacle(row, pool, kind, Vec2::new(entry_edge(dir, lead), row.y), size, vel_x);
}

/// Whether a debris decoration occupies the given column of a row
pub(crate) fn debris_at(row: &Row, pool: &ObstaclePool, column: u32) -> bool {
    row.obstacles.iter().any(|&id| {
        let ob = pool.get(id);
        ob.kind == ObstacleKind::Debris && column_at(ob.pos.x) == column
    })
}

fn entry_edge(dir: f32, lead: f32) -> f32 {
    if dir > 0.0 { -lead } else { PLAY_WIDTH + lead }
}

fn push_obstacle(
    row: &mut Row,
    pool: &mut ObstaclePool,
    kind: ObstacleKind,
    pos: Vec2,
    size: Vec2,
    vel_x: f32,
) {
    let id = pool.acquire();
    let ob = pool.get_mut(id);
    ob.kind = kind;
    ob.row = row.index;
    ob.pos = pos;
    ob.size = size;
    ob.vel_x = vel_x;
    row.obstacles.push(id);
}
