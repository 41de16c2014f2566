//! Per-frame arena update
//!
//! Advances the power-up spawn timers by the frame delta and fires spawn
//! attempts when an interval elapses.

use rand::Rng;

use super::state::{ArenaPhase, ArenaState, PickupKind};

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Pause toggle
    pub pause: bool,
}

/// Advance the arena by `dt` seconds of wall-clock time
pub fn tick(state: &mut ArenaState, input: &TickInput, dt: f32) {
    // Handle pause toggle
    if input.pause {
        match state.phase {
            ArenaPhase::Playing => {
                state.phase = ArenaPhase::Paused;
                log::info!("Arena paused");
                return;
            }
            ArenaPhase::Paused => {
                state.phase = ArenaPhase::Playing;
                log::info!("Arena resumed");
            }
            ArenaPhase::TornDown => {}
        }
    }

    // Nothing accumulates unless playing
    if state.phase != ArenaPhase::Playing {
        return;
    }

    // Clock hiccups (negative or NaN deltas) count as no time
    let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
    state.elapsed += dt;

    // Health: timer only runs while below the cap
    if state.count(PickupKind::Health) < state.settings.max_health_items {
        state.timers.health += dt;
        if state.timers.health >= state.settings.health_interval {
            state.timers.health = 0.0;
            state.spawn_pickup(PickupKind::Health);
        }
    }

    // Defensive: timer always runs, each firing is a dice roll
    state.timers.defensive += dt;
    if state.timers.defensive >= state.settings.defensive_interval {
        state.timers.defensive = 0.0;
        if state.rng.random::<f64>() < state.settings.defensive_probability {
            state.spawn_pickup(PickupKind::Defensive);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::FRAME_DT;
    use crate::settings::ArenaSettings;
    use crate::sim::state::ArenaEvent;

    fn run(state: &mut ArenaState, seconds: f32) {
        let frames = (seconds / FRAME_DT).round() as u32;
        let input = TickInput::default();
        for _ in 0..frames {
            tick(state, &input, FRAME_DT);
        }
    }

    fn quiet_defensive() -> ArenaSettings {
        ArenaSettings {
            defensive_probability: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_health_spawns_on_interval() {
        let mut state = ArenaState::new(12345, quiet_defensive()).unwrap();
        run(&mut state, 19.5);
        assert_eq!(state.count(PickupKind::Health), 0);
        run(&mut state, 1.0);
        assert_eq!(state.count(PickupKind::Health), 1);
        assert!(state.timers.health < 1.0);
    }

    #[test]
    fn test_health_never_exceeds_cap() {
        let mut state = ArenaState::new(6, quiet_defensive()).unwrap();
        run(&mut state, 120.0);
        assert_eq!(state.count(PickupKind::Health), 2);
        // Timer is frozen at cap
        let frozen = state.timers.health;
        run(&mut state, 5.0);
        assert_eq!(state.timers.health, frozen);

        let id = state.pickups[0].id;
        state.collect_pickup(id);
        run(&mut state, 20.5);
        assert_eq!(state.count(PickupKind::Health), 2);
    }

    #[test]
    fn test_pause_stops_timers() {
        let mut state = ArenaState::new(1, ArenaSettings::default()).unwrap();
        run(&mut state, 5.0);
        let before = state.timers;

        let pause = TickInput { pause: true };
        tick(&mut state, &pause, FRAME_DT);
        assert_eq!(state.phase, ArenaPhase::Paused);
        run(&mut state, 60.0);
        assert_eq!(state.timers, before);
        assert!(state.pickups.is_empty());

        // Unpause
        tick(&mut state, &pause, FRAME_DT);
        assert_eq!(state.phase, ArenaPhase::Playing);
        assert!(state.timers.health > before.health);
    }

    #[test]
    fn test_defensive_roll() {
        let always = ArenaSettings {
            defensive_probability: 1.0,
            health_interval: 1000.0,
            ..Default::default()
        };
        let mut state = ArenaState::new(2, always).unwrap();
        run(&mut state, 31.0);
        assert_eq!(state.count(PickupKind::Defensive), 3);

        let never = ArenaSettings {
            defensive_probability: 0.0,
            health_interval: 1000.0,
            ..Default::default()
        };
        let mut state = ArenaState::new(2, never).unwrap();
        run(&mut state, 100.0);
        assert_eq!(state.count(PickupKind::Defensive), 0);
        assert!(state.timers.defensive < 10.0);
    }

    #[test]
    fn test_bad_deltas_ignored() {
        let mut state = ArenaState::new(3, ArenaSettings::default()).unwrap();
        let input = TickInput::default();
        tick(&mut state, &input, -5.0);
        tick(&mut state, &input, f32::NAN);
        assert_eq!(state.elapsed, 0.0);
        assert_eq!(state.timers.health, 0.0);
    }

    #[test]
    fn test_torn_down_arena_is_inert() {
        let mut state = ArenaState::new(3, ArenaSettings::default()).unwrap();
        state.teardown();
        tick(&mut state, &TickInput { pause: true }, 50.0);
        tick(&mut state, &TickInput::default(), 50.0);
        assert_eq!(state.phase, ArenaPhase::TornDown);
        assert!(state.pickups.is_empty());
    }

    #[test]
    fn test_spawn_events_emitted() {
        let mut state = ArenaState::new(8, quiet_defensive()).unwrap();
        tick(&mut state, &TickInput::default(), 20.0);
        let events = state.drain_events();
        assert!(matches!(
            events.as_slice(),
            [ArenaEvent::PickupSpawned { kind: PickupKind::Health, .. }]
        ));
    }

    #[test]
    fn test_determinism() {
        let mut a = ArenaState::new(99999, ArenaSettings::default()).unwrap();
        let mut b = ArenaState::new(99999, ArenaSettings::default()).unwrap();
        run(&mut a, 200.0);
        run(&mut b, 200.0);
        let pos_a: Vec<_> = a.pickups.iter().map(|p| (p.id, p.pos)).collect();
        let pos_b: Vec<_> = b.pickups.iter().map(|p| (p.id, p.pos)).collect();
        assert_eq!(pos_a, pos_b);
    }
}
