//! Arena simulation module
//!
//! Placement logic lives here and stays free of rendering concerns:
//! - Seeded RNG only
//! - Occupancy rebuilt from entity lists, never cached
//! - Single writer: the game loop calling `tick`

pub mod grid;
pub mod layout;
pub mod occupancy;
pub mod sampler;
pub mod state;
pub mod tick;

pub use grid::{Cell, GridConfig};
pub use layout::{eligible_cells, generate_destructibles};
pub use occupancy::OccupancyIndex;
pub use sampler::CellSampler;
pub use state::{
    ArenaEvent, ArenaPhase, ArenaState, Obstacle, PICKUP_HEIGHT, Pickup, PickupKind, SpawnTimers,
};
pub use tick::{TickInput, tick};
