//! Arena state and entity types
//!
//! Everything placement depends on lives here and is passed explicitly to the
//! grid functions; nothing is kept in globals.

use glam::Vec3;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Cell, GridConfig};
use super::layout::generate_destructibles;
use super::occupancy::OccupancyIndex;
use super::sampler::CellSampler;
use crate::error::ConfigError;
use crate::settings::ArenaSettings;

/// Height at which pickups hover above the floor
pub const PICKUP_HEIGHT: f32 = 1.0;

/// Current phase of the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArenaPhase {
    /// Timers run and pickups spawn
    Playing,
    /// Game loop suspended: nothing accumulates
    Paused,
    /// Entities released; the arena no longer ticks
    TornDown,
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickupKind {
    /// Restores a life; capped on the board
    Health,
    /// Absorbs one blast
    Defensive,
}

impl PickupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PickupKind::Health => "health",
            PickupKind::Defensive => "defensive",
        }
    }
}

/// A destructible obstacle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    pub pos: Vec3,
}

impl Obstacle {
    pub fn cell(&self, cell_size: f32) -> Cell {
        Cell::from_world(self.pos, cell_size)
    }
}

/// A pickup entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub kind: PickupKind,
    pub pos: Vec3,
}

/// Spawn timers (seconds accumulated since last firing)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SpawnTimers {
    pub health: f32,
    pub defensive: f32,
}

/// Notifications for the presentation layer, drained once per frame
#[derive(Debug, Clone, PartialEq)]
pub enum ArenaEvent {
    PickupSpawned { id: u32, kind: PickupKind, pos: Vec3 },
    /// No free cell was found; the next interval retries
    SpawnSkipped { kind: PickupKind },
    PickupCollected { id: u32, kind: PickupKind },
    ObstacleDestroyed { id: u32, cell: Cell },
}

/// Complete arena state, owned by the game loop
#[derive(Debug, Clone)]
pub struct ArenaState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub settings: ArenaSettings,
    pub grid: GridConfig,
    pub phase: ArenaPhase,
    /// Simulated seconds while playing
    pub elapsed: f32,
    pub timers: SpawnTimers,
    /// Live destructible obstacles (sorted by id)
    pub obstacles: Vec<Obstacle>,
    /// Live pickups (sorted by id)
    pub pickups: Vec<Pickup>,
    pub(crate) rng: Pcg32,
    events: Vec<ArenaEvent>,
    /// Next entity ID
    next_id: u32,
}

impl ArenaState {
    /// Build an arena and roll its destructible layout
    pub fn new(seed: u64, settings: ArenaSettings) -> Result<Self, ConfigError> {
        settings.validate()?;
        let grid = settings.grid();
        let mut state = Self {
            seed,
            settings,
            grid,
            phase: ArenaPhase::Playing,
            elapsed: 0.0,
            timers: SpawnTimers::default(),
            obstacles: Vec::new(),
            pickups: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            events: Vec::new(),
            next_id: 1,
        };

        let cells = generate_destructibles(
            &state.grid,
            state.settings.destructible_probability,
            &mut state.rng,
        );
        for cell in cells {
            let id = state.next_entity_id();
            state.obstacles.push(Obstacle {
                id,
                pos: cell.to_world(state.grid.cell_size),
            });
        }
        log::info!(
            "Arena ready: seed {}, {}x{} grid, {} destructibles",
            seed,
            state.grid.size,
            state.grid.size,
            state.obstacles.len()
        );
        Ok(state)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Occupied cells as of now
    pub fn occupancy(&self) -> OccupancyIndex {
        OccupancyIndex::build(
            &self.grid,
            self.obstacles.iter().map(|o| o.pos),
            self.pickups.iter().map(|p| p.pos),
        )
    }

    pub fn sampler(&self) -> CellSampler {
        CellSampler::new(self.grid).with_max_attempts(self.settings.max_attempts)
    }

    /// Number of live pickups of a kind
    pub fn count(&self, kind: PickupKind) -> usize {
        self.pickups.iter().filter(|p| p.kind == kind).count()
    }

    /// Place a pickup on a free cell.
    ///
    /// A health item spawned while another is live is pushed to the opposite
    /// x-half of the oldest one. Returns the new pickup's id, or `None` when
    /// the arena is torn down, the cap is reached or the sampler found no cell.
    pub fn spawn_pickup(&mut self, kind: PickupKind) -> Option<u32> {
        if self.phase == ArenaPhase::TornDown {
            return None;
        }
        let reference = match kind {
            PickupKind::Health => {
                if self.count(PickupKind::Health) >= self.settings.max_health_items {
                    return None;
                }
                self.pickups
                    .iter()
                    .find(|p| p.kind == PickupKind::Health)
                    .map(|p| p.pos)
            }
            PickupKind::Defensive => None,
        };

        let occupancy = self.occupancy();
        let sampler = self.sampler();
        let Some(floor) = sampler.sample(&occupancy, reference, &mut self.rng) else {
            log::warn!("Skipping {} spawn: board full", kind.as_str());
            self.events.push(ArenaEvent::SpawnSkipped { kind });
            return None;
        };

        let id = self.next_entity_id();
        let pos = floor + Vec3::Y * PICKUP_HEIGHT;
        self.pickups.push(Pickup { id, kind, pos });
        self.events.push(ArenaEvent::PickupSpawned { id, kind, pos });
        log::info!(
            "Spawned {} #{} at ({}, {})",
            kind.as_str(),
            id,
            pos.x,
            pos.z
        );
        Some(id)
    }

    /// Remove the destructible obstacle on a cell (blast damage).
    ///
    /// Returns false if the cell held none or the arena is torn down.
    pub fn destroy_obstacle_at(&mut self, cell: Cell) -> bool {
        if self.phase == ArenaPhase::TornDown {
            return false;
        }
        let cell_size = self.grid.cell_size;
        let Some(index) = self
            .obstacles
            .iter()
            .position(|o| o.cell(cell_size) == cell)
        else {
            return false;
        };
        let obstacle = self.obstacles.remove(index);
        self.events.push(ArenaEvent::ObstacleDestroyed {
            id: obstacle.id,
            cell,
        });
        true
    }

    /// Remove a pickup a player walked over
    pub fn collect_pickup(&mut self, id: u32) -> Option<Pickup> {
        let index = self.pickups.iter().position(|p| p.id == id)?;
        let pickup = self.pickups.remove(index);
        self.events.push(ArenaEvent::PickupCollected {
            id: pickup.id,
            kind: pickup.kind,
        });
        log::info!("Collected {} #{}", pickup.kind.as_str(), pickup.id);
        Some(pickup)
    }

    /// Pickup lying on a cell, if any
    pub fn pickup_at(&self, cell: Cell) -> Option<&Pickup> {
        let cell_size = self.grid.cell_size;
        self.pickups
            .iter()
            .find(|p| Cell::from_world(p.pos, cell_size) == cell)
    }

    /// Take all events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<ArenaEvent> {
        std::mem::take(&mut self.events)
    }

    /// Release every entity and stop the arena
    pub fn teardown(&mut self) {
        self.obstacles.clear();
        self.pickups.clear();
        self.events.clear();
        self.timers = SpawnTimers::default();
        self.phase = ArenaPhase::TornDown;
        log::info!("Arena torn down");
    }
}
