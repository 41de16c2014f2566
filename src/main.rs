//! Arena Blast headless driver
//!
//! Rolls an arena, runs the power-up timers at 60 Hz for a while and prints
//! the resulting board.
//!
//! Usage: `arena-blast [seed] [seconds]`

use std::process::ExitCode;

use arena_blast::consts::FRAME_DT;
use arena_blast::settings::ArenaSettings;
use arena_blast::sim::{ArenaEvent, ArenaState, Cell, PickupKind, TickInput, tick};

/// Simulated seconds when none are given
const DEFAULT_SECONDS: f32 = 120.0;

fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(clock_seed);
    let seconds = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SECONDS);

    let settings = match std::env::var(ArenaSettings::PATH_ENV_VAR) {
        Ok(path) => match ArenaSettings::load(&path) {
            Ok(settings) => settings,
            Err(err) => {
                log::error!("Invalid settings in {}: {}", path, err);
                return ExitCode::FAILURE;
            }
        },
        Err(_) => ArenaSettings::default(),
    };

    let mut state = match ArenaState::new(seed, settings) {
        Ok(state) => state,
        Err(err) => {
            log::error!("Cannot build arena: {}", err);
            return ExitCode::FAILURE;
        }
    };
    log::info!("Arena Blast (headless) seed {} for {}s", seed, seconds);

    let input = TickInput::default();
    let frames = (seconds / FRAME_DT).round() as u64;
    let mut skipped = 0u32;
    for _ in 0..frames {
        tick(&mut state, &input, FRAME_DT);
        for event in state.drain_events() {
            match event {
                ArenaEvent::PickupSpawned { id, kind, pos } => {
                    println!(
                        "[{:7.2}s] {} #{} at ({}, {})",
                        state.elapsed,
                        kind.as_str(),
                        id,
                        pos.x,
                        pos.z
                    );
                }
                ArenaEvent::SpawnSkipped { .. } => skipped += 1,
                _ => {}
            }
        }
    }

    println!();
    println!("{}", render_board(&state));
    println!(
        "{} destructibles, {} health, {} defensive, {} skipped spawns",
        state.obstacles.len(),
        state.count(PickupKind::Health),
        state.count(PickupKind::Defensive),
        skipped
    );
    ExitCode::SUCCESS
}

fn clock_seed() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Top-down view, z rows from far to near:
/// `#` border, `@` pillar, `+` destructible, `P` spawn, `H`/`D` pickups
fn render_board(state: &ArenaState) -> String {
    let grid = state.grid;
    let spawns = grid.player_spawns();
    let cell_size = grid.cell_size;
    let outer = grid.extent() + 1;

    let mut out = String::new();
    for z in (-outer..=outer).rev() {
        for x in -outer..=outer {
            let cell = Cell::new(x, z);
            let glyph = if !grid.in_domain(cell) {
                '#'
            } else if cell.is_lattice() {
                '@'
            } else if spawns.contains(&cell) {
                'P'
            } else if let Some(pickup) = state.pickup_at(cell) {
                match pickup.kind {
                    PickupKind::Health => 'H',
                    PickupKind::Defensive => 'D',
                }
            } else if state.obstacles.iter().any(|o| o.cell(cell_size) == cell) {
                '+'
            } else {
                '.'
            };
            out.push(glyph);
            out.push(' ');
        }
        out.push('\n');
    }
    out
}
