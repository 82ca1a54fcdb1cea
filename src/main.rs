//! Lane Hopper entry point
//!
//! Headless demo runner: plays one run with a simple autopilot at the fixed
//! simulation rate, streaming events to the log, then folds the result into
//! the on-disk profile. A graphical shell would drive the same `tick` loop
//! from its frame callback instead.

use lane_hopper::consts::*;
use lane_hopper::profile::Profile;
use lane_hopper::{cell_center_x, column_at};
use lane_hopper::sim::{FrameView, GameEvent, GamePhase, GameState, RowKind, TickInput, tick};

/// Hard cap so a lucky autopilot cannot run forever
const MAX_DEMO_TICKS: u64 = 60 * 60 * 5;

fn main() {
    env_logger::init();

    let profile_path = Profile::default_path();
    let mut profile = Profile::load(&profile_path);
    log::info!(
        "Lane Hopper starting (best {}, bank {} coins)",
        profile.best_distance,
        profile.coins
    );

    let mut state = GameState::new(profile.selected_skin);
    state.start();

    for _ in 0..MAX_DEMO_TICKS {
        if state.phase != GamePhase::Playing {
            break;
        }

        let input = TickInput {
            step: pick_step(&state),
            ..Default::default()
        };
        tick(&mut state, &input, SIM_DT);

        for event in state.drain_events() {
            match event {
                GameEvent::CoinCollected { row, column } => {
                    log::info!("coin at row {row}, column {column}");
                }
                GameEvent::Crash => log::info!("crash!"),
                GameEvent::Splash => log::info!("splash!"),
                GameEvent::Hop | GameEvent::RunEnded { .. } => {}
            }
        }
    }

    let (distance, coins) = (state.distance, state.coins);
    let new_best = profile.apply_run(distance, coins);
    if let Err(err) = profile.save(&profile_path) {
        log::warn!("could not save profile: {err}");
    }

    println!(
        "run over: distance {distance}, coins {coins}{}",
        if new_best { " (new best!)" } else { "" }
    );
}

/// Greedy autopilot: hop forward when the row ahead looks survivable right
/// now, otherwise sidestep toward a clear column, otherwise wait.
fn pick_step(state: &GameState) -> Option<(i8, i8)> {
    let frame = state.frame();
    let player = frame.player();
    if player.is_moving() {
        return None;
    }

    let Some(ahead) = state.row(player.row + 1) else {
        return None;
    };

    if cell_clear(&frame, ahead.index, player.column) {
        return Some((0, 1));
    }
    for dx in [-1i8, 1] {
        let column = player.column as i64 + dx as i64;
        if (0..COLUMN_COUNT as i64).contains(&column)
            && cell_clear(&frame, ahead.index, column as u32)
            && cell_clear(&frame, player.row, column as u32)
        {
            return Some((dx, 0));
        }
    }
    None
}

/// Whether hopping onto this cell right now would survive the landing tick
fn cell_clear(frame: &FrameView<'_>, row_index: u32, column: u32) -> bool {
    let Some(row) = frame.rows().find(|r| r.index == row_index) else {
        return false;
    };
    let x = cell_center_x(column);

    match row.kind {
        RowKind::River => frame
            .row_obstacles(row)
            .any(|ob| ob.left() <= x && x <= ob.right()),
        RowKind::Road | RowKind::Rail => !frame
            .row_obstacles(row)
            .any(|ob| (ob.pos.x - x).abs() < CELL_SIZE * 2.0),
        _ => !frame
            .row_obstacles(row)
            .any(|ob| column_at(ob.pos.x) == column),
    }
}
